//! The INI-like configuration file format: sections `[checking]`,
//! `[filtering]`, `[authentication]`, `[output]`, `[logger-*]`, with
//! semantics mirroring the CLI options.
//!
//! The grammar itself is small (sections, `key = value` pairs, `#`/`;`
//! comments), so it is hand-rolled here rather than pulling in a
//! general-purpose INI crate for three parsing rules.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// A parsed config file: section name -> ordered `(key, value)` pairs.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    sections: BTreeMap<String, Vec<(String, String)>>,
}

impl ConfigFile {
    /// Load and parse `path`.
    ///
    /// # Errors
    /// [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::MalformedLine`]/[`ConfigError::KeyOutsideSection`] on
    /// a syntax error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse already-read text. `path` is only used to annotate errors.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut sections: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(body) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                let name = body.trim().to_ascii_lowercase();
                sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }

            let (key, value) = split_key_value(line).ok_or_else(|| ConfigError::MalformedLine {
                path: path.to_path_buf(),
                line: line_no,
                text: raw_line.to_string(),
            })?;

            let section = current.clone().ok_or_else(|| ConfigError::KeyOutsideSection {
                path: path.to_path_buf(),
                line: line_no,
                text: raw_line.to_string(),
            })?;

            sections
                .entry(section)
                .or_default()
                .push((key.to_ascii_lowercase(), value.to_string()));
        }

        Ok(Self { sections })
    }

    #[must_use]
    pub fn section(&self, name: &str) -> &[(String, String)] {
        self.sections
            .get(name)
            .map_or(&[], std::vec::Vec::as_slice)
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key` within `section`, in file order. Used for
    /// repeated keys such as `ignore_url` entries.
    pub fn get_all<'a>(&'a self, section: &'a str, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.section(section)
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every section whose name matches `logger-*`, yielding the suffix and
    /// its key/value pairs.
    pub fn logger_sections(&self) -> impl Iterator<Item = (&str, &[(String, String)])> {
        self.sections.iter().filter_map(|(name, pairs)| {
            name.strip_prefix("logger-")
                .map(|suffix| (suffix, pairs.as_slice()))
        })
    }
}

fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let sep = line.find(['=', ':'])?;
    let (key, rest) = line.split_at(sep);
    let value = &rest[1..];
    Some((key.trim(), value.trim()))
}

/// The default config file location, `$HOME/.linkchecker/linkcheckerrc`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".linkchecker").join("linkcheckerrc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_pairs() {
        let text = "\
[checking]
threads = 5
timeout: 30

# a comment
[filtering]
ignore_url = foo
ignore_url = bar
";
        let file = ConfigFile::parse(text, Path::new("<test>")).unwrap();
        assert_eq!(file.get("checking", "threads"), Some("5"));
        assert_eq!(file.get("checking", "timeout"), Some("30"));
        assert_eq!(
            file.get_all("filtering", "ignore_url").collect::<Vec<_>>(),
            vec!["foo", "bar"]
        );
    }

    #[test]
    fn key_before_any_section_is_an_error() {
        let err = ConfigFile::parse("threads = 5\n", Path::new("<test>")).unwrap_err();
        assert!(matches!(err, ConfigError::KeyOutsideSection { .. }));
    }

    #[test]
    fn line_without_separator_is_malformed() {
        let err = ConfigFile::parse("[checking]\nnonsense\n", Path::new("<test>")).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedLine { .. }));
    }

    #[test]
    fn logger_sections_are_discovered_by_prefix() {
        let text = "[logger-html]\nfilename = out.html\n";
        let file = ConfigFile::parse(text, Path::new("<test>")).unwrap();
        let found: Vec<_> = file.logger_sections().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "html");
    }
}
