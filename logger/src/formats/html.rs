//! Standalone-HTML formatter: a self-contained document with colored
//! result cells.

use linkchecker_types::UrlItemWire;

use super::escape::html_escape;
use crate::sink::Sink;
use crate::{Logger, Summary};

pub struct HtmlFormatter {
    sink: Sink,
    rows: String,
}

impl HtmlFormatter {
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            rows: String::new(),
        }
    }
}

impl Logger for HtmlFormatter {
    fn start(&mut self) {
        self.sink.write("<!DOCTYPE html>\n<html>\n<head><title>LinkChecker results</title></head>\n<body>\n<table border=\"1\">\n");
        self.sink
            .write("<tr><th>Parent</th><th>URL</th><th>Name</th><th>Result</th><th>Warnings</th></tr>\n");
    }

    fn log(&mut self, item: &UrlItemWire) {
        let class = if item.valid { "valid" } else { "invalid" };
        let color = if item.valid { "#c8f7c5" } else { "#f7c5c5" };
        let warnings = item
            .warnings
            .iter()
            .map(|w| html_escape(&w.text))
            .collect::<Vec<_>>()
            .join("<br>");
        self.rows.push_str(&format!(
            "<tr class=\"{class}\" style=\"background-color:{color}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(item.parent_url.as_deref().unwrap_or("")),
            html_escape(&item.raw_ref),
            html_escape(&item.name),
            if item.valid { "valid" } else { "error" },
            warnings,
        ));
    }

    fn end(&mut self, summary: &Summary) {
        self.sink.write(&self.rows.clone());
        self.sink.write("</table>\n");
        self.sink.write(&format!(
            "<p>{} checked, {} valid, {} invalid, {} from cache, {:.1}s elapsed.</p>\n",
            summary.checked,
            summary.valid,
            summary.invalid,
            summary.cached,
            summary.elapsed.as_secs_f64()
        ));
        self.sink.write("</body>\n</html>\n");
        self.sink.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn item(valid: bool) -> UrlItemWire {
        UrlItemWire {
            parent_url: Some("http://example.test/".to_string()),
            raw_ref: "page.html".to_string(),
            canonical: Some("http://example.test/page.html".to_string()),
            anchor: None,
            name: "page.html".to_string(),
            valid,
            cached: false,
            messages: Vec::new(),
            warnings: Vec::new(),
            size: None,
            duration: Some(Duration::ZERO),
            depth: 0,
        }
    }

    #[test]
    fn invalid_rows_get_the_error_css_class() {
        let sink = Sink::Buffered {
            path: std::path::PathBuf::from("out.html"),
            buffer: String::new(),
        };
        let mut formatter = HtmlFormatter::new(sink);
        formatter.start();
        formatter.log(&item(false));
        assert!(formatter.rows.contains("class=\"invalid\""));
    }

    #[test]
    fn angle_brackets_in_a_url_are_escaped() {
        let mut formatter = HtmlFormatter::new(Sink::Stdout);
        let mut poisoned = item(true);
        poisoned.name = "<script>".to_string();
        formatter.log(&poisoned);
        assert!(formatter.rows.contains("&lt;script&gt;"));
    }
}
