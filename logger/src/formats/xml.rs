//! XML formatter.

use linkchecker_types::UrlItemWire;

use super::escape::xml_escape;
use crate::sink::Sink;
use crate::{Logger, Summary};

pub struct XmlFormatter {
    sink: Sink,
    body: String,
}

impl XmlFormatter {
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            body: String::new(),
        }
    }
}

impl Logger for XmlFormatter {
    fn start(&mut self) {
        self.sink.write("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<linkchecker>\n");
    }

    fn log(&mut self, item: &UrlItemWire) {
        self.body.push_str(&format!(
            "  <url ref=\"{}\" canonical=\"{}\" valid=\"{}\" cached=\"{}\">\n",
            xml_escape(&item.raw_ref),
            xml_escape(item.canonical.as_deref().unwrap_or("")),
            item.valid,
            item.cached,
        ));
        if let Some(parent) = &item.parent_url {
            self.body.push_str(&format!("    <parent>{}</parent>\n", xml_escape(parent)));
        }
        if let Some(anchor) = &item.anchor {
            self.body.push_str(&format!("    <anchor>{}</anchor>\n", xml_escape(anchor)));
        }
        self.body.push_str(&format!("    <name>{}</name>\n", xml_escape(&item.name)));
        for message in &item.messages {
            self.body.push_str(&format!("    <info>{}</info>\n", xml_escape(message)));
        }
        for warning in &item.warnings {
            self.body
                .push_str(&format!("    <warning tag=\"{}\">{}</warning>\n", warning.tag, xml_escape(&warning.text)));
        }
        if let Some(size) = item.size {
            self.body.push_str(&format!("    <size>{size}</size>\n"));
        }
        if let Some(duration) = item.duration {
            self.body.push_str(&format!("    <time>{:.3}</time>\n", duration.as_secs_f64()));
        }
        self.body.push_str("  </url>\n");
    }

    fn end(&mut self, summary: &Summary) {
        self.sink.write(&self.body.clone());
        self.sink.write(&format!(
            "  <summary checked=\"{}\" valid=\"{}\" invalid=\"{}\" cached=\"{}\" elapsed=\"{:.3}\"/>\n",
            summary.checked,
            summary.valid,
            summary.invalid,
            summary.cached,
            summary.elapsed.as_secs_f64()
        ));
        self.sink.write("</linkchecker>\n");
        self.sink.flush();
    }
}
