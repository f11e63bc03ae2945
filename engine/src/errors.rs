//! Engine-level errors: failures in the plumbing around a check, not in
//! the check itself. Per-URL failures always become an `invalid`
//! `UrlItem`, never a propagated `Err`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no seed URLs to check")]
    NoSeeds,
    #[error(transparent)]
    Protocol(#[from] linkchecker_protocols::ProtocolError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to build the HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}
