//! Plumbing errors a handler can raise. Ordinary check failures (404,
//! timeout, DNS failure, ...) are not errors — they are folded into the
//! `UrlItem` as `invalid` with a tagged warning. This enum exists only for
//! failures that mean the handler itself is misconfigured or the runtime
//! is out of resources.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed URL passed to handler: {0}")]
    UrlParse(#[from] url::ParseError),
}
