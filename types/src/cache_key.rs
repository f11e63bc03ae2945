//! The at-most-once cache key derived from a canonical URL.
//!
//! Two URLs with equal cache keys share a single result. The key
//! intentionally drops the fragment (kept separately as `anchor`
//! on the `UrlItem`) unless anchor checking changes that at a higher layer.

use std::fmt;

use crate::Scheme;

/// An opaque, hashable, orderable identity for "the same thing to check".
///
/// Construct via `linkchecker_core::normalize`, never by hand outside of
/// tests — the normalization rules (lowercasing, default-port elision, dot
/// segment removal) live there, not here. This type just carries the
/// already-normalized string around with the equality/hash semantics the
/// result cache depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a cache key from an already-normalized canonical URL string.
    /// Callers outside `linkchecker-core` should not call this directly.
    #[must_use]
    pub fn from_normalized(canonical: String) -> Self {
        Self(canonical)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn scheme(&self) -> Scheme {
        let raw = self.0.split(':').next().unwrap_or_default();
        Scheme::parse(raw)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
