//! `-F format/destination` parsing.

use std::path::PathBuf;

use crate::errors::ConfigError;

/// One of the nine closed output-format kinds LinkChecker ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Html,
    Csv,
    Xml,
    Gml,
    Dot,
    Sql,
    Sitemap,
    Blacklist,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "csv" => Ok(Self::Csv),
            "xml" => Ok(Self::Xml),
            "gml" => Ok(Self::Gml),
            "dot" => Ok(Self::Dot),
            "sql" => Ok(Self::Sql),
            "sitemap" => Ok(Self::Sitemap),
            "blacklist" => Ok(Self::Blacklist),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }

    /// Per-format default output filename, `linkchecker-out.<ext>`.
    #[must_use]
    pub const fn default_filename(self) -> &'static str {
        match self {
            Self::Text => "linkchecker-out.txt",
            Self::Html => "linkchecker-out.html",
            Self::Csv => "linkchecker-out.csv",
            Self::Xml => "linkchecker-out.xml",
            Self::Gml => "linkchecker-out.gml",
            Self::Dot => "linkchecker-out.dot",
            Self::Sql => "linkchecker-out.sql",
            Self::Sitemap => "linkchecker-out.sitemap.xml",
            Self::Blacklist => "linkchecker-out.blacklist",
        }
    }
}

/// A fully resolved formatter: its kind and where it writes.
#[derive(Debug, Clone)]
pub struct FormatterSpec {
    pub format: OutputFormat,
    pub destination: Destination,
}

/// `-` means stdout; anything else is a path, written via
/// `linkchecker_utils::atomic_write`.
#[derive(Debug, Clone)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl FormatterSpec {
    /// Parse one `-F` argument: `format` alone (uses the format's default
    /// filename) or `format/destination`.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let (format_name, dest) = match spec.split_once('/') {
            Some((f, d)) => (f, d),
            None => (spec, ""),
        };

        if format_name.is_empty() {
            return Err(ConfigError::MalformedFormatterSpec(spec.to_string()));
        }

        let format = OutputFormat::parse(format_name)?;
        let destination = if dest.is_empty() {
            match format {
                OutputFormat::Text => Destination::Stdout,
                other => Destination::File(PathBuf::from(other.default_filename())),
            }
        } else if dest == "-" {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(dest))
        };

        Ok(Self { format, destination })
    }
}
