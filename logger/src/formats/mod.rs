//! The nine formatter implementations, each matching its format's
//! bit-exact output surface.

mod blacklist;
mod csv;
mod dot;
mod escape;
mod gml;
mod html;
mod sitemap;
mod sql;
mod text;
mod xml;

pub use blacklist::BlacklistFormatter;
pub use csv::CsvFormatter;
pub use dot::DotFormatter;
pub use gml::GmlFormatter;
pub use html::HtmlFormatter;
pub use sitemap::SitemapFormatter;
pub use sql::SqlFormatter;
pub use text::TextFormatter;
pub use xml::XmlFormatter;

use linkchecker_config::{Destination, FormatterSpec, OutputFormat};

use crate::sink::Sink;
use crate::Logger;

/// Build the concrete formatter for one resolved `-F format/destination`.
/// A closed enum dispatch rather than a dynamic plugin registry.
#[must_use]
pub fn build(spec: &FormatterSpec) -> Box<dyn Logger> {
    let sink = Sink::new(&spec.destination);
    match spec.format {
        OutputFormat::Text => Box::new(TextFormatter::new(sink, matches!(spec.destination, Destination::Stdout))),
        OutputFormat::Html => Box::new(HtmlFormatter::new(sink)),
        OutputFormat::Csv => Box::new(CsvFormatter::new(sink, ',', '"')),
        OutputFormat::Xml => Box::new(XmlFormatter::new(sink)),
        OutputFormat::Gml => Box::new(GmlFormatter::new(sink)),
        OutputFormat::Dot => Box::new(DotFormatter::new(sink)),
        OutputFormat::Sql => Box::new(SqlFormatter::new(sink)),
        OutputFormat::Sitemap => Box::new(SitemapFormatter::new(sink)),
        OutputFormat::Blacklist => Box::new(BlacklistFormatter::new(sink)),
    }
}
