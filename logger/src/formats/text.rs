//! Human-readable text formatter with optional ANSI color.

use linkchecker_types::UrlItemWire;

use crate::sink::Sink;
use crate::{Logger, Summary};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

pub struct TextFormatter {
    sink: Sink,
    color: bool,
}

impl TextFormatter {
    #[must_use]
    pub fn new(sink: Sink, color: bool) -> Self {
        Self { sink, color }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Logger for TextFormatter {
    fn start(&mut self) {}

    fn log(&mut self, item: &UrlItemWire) {
        if let Some(parent) = &item.parent_url {
            self.sink.write_line(&format!("url    {} (from {parent})", item.raw_ref));
        } else {
            self.sink.write_line(&format!("url    {}", item.raw_ref));
        }
        self.sink.write_line(&format!("  name   {}", item.name));
        if let Some(anchor) = &item.anchor {
            self.sink.write_line(&format!("  anchor #{anchor}"));
        }
        let status = if item.valid {
            self.paint("valid", GREEN)
        } else {
            self.paint("error", RED)
        };
        self.sink.write_line(&format!("  result {status}{}", if item.cached { " (cached)" } else { "" }));
        for message in &item.messages {
            self.sink.write_line(&format!("  info   {message}"));
        }
        for warning in &item.warnings {
            self.sink.write_line(&format!("  warning [{}] {}", warning.tag, warning.text));
        }
        if let Some(size) = item.size {
            self.sink.write_line(&format!("  size   {size} bytes"));
        }
        if let Some(duration) = item.duration {
            self.sink.write_line(&format!("  time   {:.3}s", duration.as_secs_f64()));
        }
        self.sink.write_line("");
    }

    fn end(&mut self, summary: &Summary) {
        self.sink.write_line(&format!(
            "{} URLs checked, {} valid, {} invalid, {} from cache, {:.1}s elapsed.",
            summary.checked,
            summary.valid,
            summary.invalid,
            summary.cached,
            summary.elapsed.as_secs_f64()
        ));
        self.sink.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkchecker_types::{Warning, WarningTag};
    use std::time::Duration;

    fn sample_item() -> UrlItemWire {
        UrlItemWire {
            parent_url: Some("http://example.test/".to_string()),
            raw_ref: "bad.html".to_string(),
            canonical: Some("http://example.test/bad.html".to_string()),
            anchor: None,
            name: "http://example.test/bad.html".to_string(),
            valid: false,
            cached: false,
            messages: vec!["404 Not Found".to_string()],
            warnings: vec![Warning::new(WarningTag::UrlUnreachable, "404 Not Found")],
            size: None,
            duration: Some(Duration::from_millis(250)),
            depth: 1,
        }
    }

    #[test]
    fn plain_text_carries_no_escape_codes() {
        let mut formatter = TextFormatter::new(Sink::Stdout, false);
        formatter.start();
        formatter.log(&sample_item());
        formatter.end(&Summary::default());
    }

    #[test]
    fn color_mode_wraps_the_result_word_in_sgr_codes() {
        let sink = Sink::Buffered {
            path: std::path::PathBuf::from("unused"),
            buffer: String::new(),
        };
        let mut formatter = TextFormatter::new(sink, true);
        formatter.log(&sample_item());
        if let Sink::Buffered { buffer, .. } = &formatter.sink {
            assert!(buffer.contains("\x1b[31m"));
        }
    }
}
