//! `sitemap.xml` formatter. Only valid, intern-reachable URLs belong in a
//! sitemap — cached duplicates and
//! broken links are meaningless there, so this formatter keeps exactly one
//! `<url>` entry per distinct canonical URL that checked out valid.

use std::collections::HashSet;

use linkchecker_types::UrlItemWire;

use super::escape::xml_escape;
use crate::sink::Sink;
use crate::{Logger, Summary};

pub struct SitemapFormatter {
    sink: Sink,
    body: String,
    seen: HashSet<String>,
}

impl SitemapFormatter {
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            body: String::new(),
            seen: HashSet::new(),
        }
    }
}

impl Logger for SitemapFormatter {
    fn start(&mut self) {
        self.sink
            .write("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    }

    fn log(&mut self, item: &UrlItemWire) {
        let Some(canonical) = &item.canonical else { return };
        if !item.valid || !self.seen.insert(canonical.clone()) {
            return;
        }
        self.body
            .push_str(&format!("  <url>\n    <loc>{}</loc>\n  </url>\n", xml_escape(canonical)));
    }

    fn end(&mut self, _summary: &Summary) {
        self.sink.write(&self.body.clone());
        self.sink.write("</urlset>\n");
        self.sink.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(valid: bool, canonical: &str) -> UrlItemWire {
        UrlItemWire {
            parent_url: None,
            raw_ref: canonical.to_string(),
            canonical: Some(canonical.to_string()),
            anchor: None,
            name: canonical.to_string(),
            valid,
            cached: false,
            messages: Vec::new(),
            warnings: Vec::new(),
            size: None,
            duration: None,
            depth: 0,
        }
    }

    #[test]
    fn invalid_urls_are_excluded() {
        let mut formatter = SitemapFormatter::new(Sink::Stdout);
        formatter.log(&item(false, "http://example.test/gone"));
        assert!(formatter.body.is_empty());
    }

    #[test]
    fn duplicates_are_collapsed() {
        let mut formatter = SitemapFormatter::new(Sink::Stdout);
        formatter.log(&item(true, "http://example.test/"));
        formatter.log(&item(true, "http://example.test/"));
        assert_eq!(formatter.body.matches("<loc>").count(), 1);
    }
}
