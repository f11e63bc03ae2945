//! Error types for URL normalization.

use thiserror::Error;

/// Failure to resolve a raw reference into a canonical URL. Maps to the
/// `url-invalid` warning tag one layer up, in `linkchecker-engine`.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid base URL: {0}")]
    InvalidBase(#[source] url::ParseError),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[source] url::ParseError),
}
