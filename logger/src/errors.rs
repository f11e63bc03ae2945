//! Logger-level errors. A formatter that fails to persist its output does
//! not abort the crawl — logging is a pure reporting path — so these are
//! surfaced via `tracing::warn!` at the call site rather than threaded
//! back through `Logger::log`/`end`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("failed to persist {path}: {source}")]
    Persist {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
