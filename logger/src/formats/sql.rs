//! SQL INSERT-statement formatter.

use linkchecker_types::UrlItemWire;

use super::escape::sql_escape;
use crate::sink::Sink;
use crate::{Logger, Summary};

const TABLE: &str = "linkchecker_urls";

pub struct SqlFormatter {
    sink: Sink,
}

impl SqlFormatter {
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self { sink }
    }
}

impl Logger for SqlFormatter {
    fn start(&mut self) {
        self.sink.write_line(&format!(
            "CREATE TABLE IF NOT EXISTS {TABLE} (parent TEXT, url TEXT, name TEXT, valid INTEGER, cached INTEGER, size INTEGER, duration_secs REAL, warnings TEXT);"
        ));
    }

    fn log(&mut self, item: &UrlItemWire) {
        let warnings = item.warnings.iter().map(|w| w.tag.as_str()).collect::<Vec<_>>().join(";");
        self.sink.write_line(&format!(
            "INSERT INTO {TABLE} (parent, url, name, valid, cached, size, duration_secs, warnings) VALUES ('{}', '{}', '{}', {}, {}, {}, {}, '{}');",
            sql_escape(item.parent_url.as_deref().unwrap_or("")),
            sql_escape(item.canonical.as_deref().unwrap_or(&item.raw_ref)),
            sql_escape(&item.name),
            i32::from(item.valid),
            i32::from(item.cached),
            item.size.map_or("NULL".to_string(), |s| s.to_string()),
            item.duration.map_or("NULL".to_string(), |d| format!("{:.3}", d.as_secs_f64())),
            sql_escape(&warnings),
        ));
    }

    fn end(&mut self, _summary: &Summary) {
        self.sink.flush();
    }
}
