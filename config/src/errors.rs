//! Configuration errors: fatal, raised before workers start.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path}:{line}: malformed line: {text}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        text: String,
    },
    #[error("config file {path}:{line}: key outside of any section: {text}")]
    KeyOutsideSection {
        path: PathBuf,
        line: usize,
        text: String,
    },
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
    #[error("unknown output format {0:?}")]
    UnknownFormat(String),
    #[error("-F/--output expects FORMAT/DESTINATION, got {0:?}")]
    MalformedFormatterSpec(String),
    #[error("no seed URLs given")]
    NoSeeds,
}
