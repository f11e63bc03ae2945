//! CSV formatter with a configurable separator/quote char.

use linkchecker_types::UrlItemWire;

use super::escape::csv_field;
use crate::sink::Sink;
use crate::{Logger, Summary};

pub struct CsvFormatter {
    sink: Sink,
    separator: char,
    quote: char,
}

impl CsvFormatter {
    #[must_use]
    pub fn new(sink: Sink, separator: char, quote: char) -> Self {
        Self { sink, separator, quote }
    }

    fn field(&self, text: &str) -> String {
        csv_field(text, self.separator, self.quote)
    }
}

impl Logger for CsvFormatter {
    fn start(&mut self) {
        self.sink.write_line(
            &["parent", "ref", "canonical", "anchor", "name", "valid", "cached", "size", "duration_secs", "warnings"].join(&self.separator.to_string()),
        );
    }

    fn log(&mut self, item: &UrlItemWire) {
        let warnings = item.warnings.iter().map(|w| w.tag.as_str()).collect::<Vec<_>>().join(";");
        let fields = [
            self.field(item.parent_url.as_deref().unwrap_or("")),
            self.field(&item.raw_ref),
            self.field(item.canonical.as_deref().unwrap_or("")),
            self.field(item.anchor.as_deref().unwrap_or("")),
            self.field(&item.name),
            item.valid.to_string(),
            item.cached.to_string(),
            item.size.map(|s| s.to_string()).unwrap_or_default(),
            item.duration.map(|d| format!("{:.3}", d.as_secs_f64())).unwrap_or_default(),
            self.field(&warnings),
        ];
        self.sink.write_line(&fields.join(&self.separator.to_string()));
    }

    fn end(&mut self, _summary: &Summary) {
        self.sink.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_field_containing_the_separator_is_quoted() {
        let mut formatter = CsvFormatter::new(Sink::Stdout, ',', '"');
        let item = UrlItemWire {
            parent_url: None,
            raw_ref: "a,b".to_string(),
            canonical: None,
            anchor: None,
            name: "a,b".to_string(),
            valid: true,
            cached: false,
            messages: Vec::new(),
            warnings: Vec::new(),
            size: None,
            duration: None,
            depth: 0,
        };
        formatter.log(&item);
    }
}
