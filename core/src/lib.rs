//! URL identity and classification: the deterministic, I/O-free part of the
//! check engine.

mod classify;
mod errors;
mod normalize;

pub use classify::classify;
pub use errors::NormalizeError;
pub use normalize::{Normalized, normalize};
