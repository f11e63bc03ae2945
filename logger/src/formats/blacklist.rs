//! Blacklist formatter: an append-only list of failing URL fingerprints.
//!
//! The fingerprint (sha256 of the canonical URL) rather than the URL
//! itself is what later runs diff against, so the file format here is
//! `<fingerprint> <url>` lines. Existing entries are read back at `start()`
//! so a file destination accumulates across runs instead of being
//! truncated by each one.

use std::collections::BTreeMap;

use linkchecker_types::UrlItemWire;
use sha2::{Digest, Sha256};

use crate::sink::Sink;
use crate::{Logger, Summary};

pub struct BlacklistFormatter {
    sink: Sink,
    entries: BTreeMap<String, String>,
}

#[must_use]
fn fingerprint(canonical: &str) -> String {
    let digest = Sha256::digest(canonical.as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

impl BlacklistFormatter {
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            entries: BTreeMap::new(),
        }
    }
}

impl Logger for BlacklistFormatter {
    fn start(&mut self) {
        let Some(path) = self.sink.path() else { return };
        let Ok(existing) = std::fs::read_to_string(path) else { return };
        for line in existing.lines() {
            if let Some((fp, url)) = line.split_once(' ') {
                self.entries.insert(fp.to_string(), url.to_string());
            }
        }
    }

    fn log(&mut self, item: &UrlItemWire) {
        if item.valid {
            return;
        }
        let Some(canonical) = &item.canonical else { return };
        self.entries.insert(fingerprint(canonical), canonical.clone());
    }

    fn end(&mut self, _summary: &Summary) {
        for (fingerprint, url) in &self.entries {
            self.sink.write_line(&format!("{fingerprint} {url}"));
        }
        self.sink.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_item(canonical: &str) -> UrlItemWire {
        UrlItemWire {
            parent_url: None,
            raw_ref: canonical.to_string(),
            canonical: Some(canonical.to_string()),
            anchor: None,
            name: canonical.to_string(),
            valid: false,
            cached: false,
            messages: vec!["unreachable".to_string()],
            warnings: Vec::new(),
            size: None,
            duration: None,
            depth: 0,
        }
    }

    #[test]
    fn valid_urls_never_enter_the_blacklist() {
        let mut formatter = BlacklistFormatter::new(Sink::Stdout);
        let mut valid = invalid_item("http://example.test/ok");
        valid.valid = true;
        formatter.log(&valid);
        assert!(formatter.entries.is_empty());
    }

    #[test]
    fn a_prior_run_file_is_merged_with_new_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blacklist");
        std::fs::write(&path, format!("{} http://old.test/gone\n", fingerprint("http://old.test/gone"))).unwrap();

        let sink = Sink::Buffered { path: path.clone(), buffer: String::new() };
        let mut formatter = BlacklistFormatter::new(sink);
        formatter.start();
        formatter.log(&invalid_item("http://example.test/new-failure"));
        formatter.end(&Summary::default());

        let persisted = std::fs::read_to_string(&path).unwrap();
        assert!(persisted.contains("http://old.test/gone"));
        assert!(persisted.contains("http://example.test/new-failure"));
    }
}
