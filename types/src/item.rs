//! The `UrlItem` data model: one unit of checking.

use std::time::Duration;

use crate::{CacheKey, Scheme, Warning};

/// Where a URL was found: a page or stylesheet URL plus the position of the
/// reference inside it (for diagnostics only, never used for equality).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub parent_url: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// Intern/extern classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Intern,
    Extern,
}

/// The outcome of checking a URL. `unchecked` is the pre-check state; once a
/// handler runs (or a cache hit supplies a prior result) it becomes either
/// `Valid` or `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Unchecked,
    Valid,
    Invalid,
}

impl CheckStatus {
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A raw child reference extracted from HTML/CSS content, before
/// resolution against its base URL: `(raw_ref, line, column,
/// base_override?)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRef {
    pub raw_ref: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub base_override: Option<String>,
}

/// One unit of checking: the full lifecycle record for a single URL.
///
/// Invariants:
/// - `depth >= 0` (enforced by the `u32` type itself).
/// - `canonical`, once set by the engine at `queued -> aggregated`, is
///   immutable for the remainder of the item's life.
/// - `cached` is true iff the canonical key already had a recorded result
///   when this item was dequeued.
/// - every `Warning` carries a tag drawn from the closed `WarningTag`
///   enumeration.
/// - if `status` is `Invalid`, `messages` has at least one entry.
#[derive(Debug, Clone)]
pub struct UrlItem {
    pub raw_ref: String,
    pub origin: Option<Origin>,
    pub depth: u32,
    pub base_url: Option<String>,

    /// Set once normalization succeeds; `None` means the URL failed to
    /// parse/resolve at all (a fatal `url-invalid` condition).
    pub canonical: Option<String>,
    pub cache_key: Option<CacheKey>,
    pub scheme: Scheme,
    pub anchor: Option<String>,
    pub classification: Classification,

    pub status: CheckStatus,
    pub messages: Vec<String>,
    pub warnings: Vec<Warning>,
    pub cached: bool,

    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub duration: Option<Duration>,

    /// Populated after extraction runs, `None` before that or for
    /// non-extractable content.
    pub children: Option<Vec<ChildRef>>,
}

impl UrlItem {
    /// A fresh item, as inserted by the director from a seed or by a
    /// parent's extract phase.
    #[must_use]
    pub fn new(raw_ref: String, origin: Option<Origin>, depth: u32, base_url: Option<String>) -> Self {
        Self {
            raw_ref,
            origin,
            depth,
            base_url,
            canonical: None,
            cache_key: None,
            scheme: Scheme::Unsupported,
            anchor: None,
            classification: Classification::Extern,
            status: CheckStatus::Unchecked,
            messages: Vec::new(),
            warnings: Vec::new(),
            cached: false,
            content_type: None,
            size: None,
            duration: None,
            children: None,
        }
    }

    /// Mark invalid, recording the explaining message plus a tagged
    /// warning. Enforces invariant (e): valid=false implies a message.
    pub fn mark_invalid(&mut self, tag: crate::WarningTag, message: impl Into<String>) {
        let message = message.into();
        self.status = CheckStatus::Invalid;
        self.warnings.push(Warning::new(tag, message.clone()));
        self.messages.push(message);
    }

    pub fn mark_valid(&mut self) {
        self.status = CheckStatus::Valid;
    }

    #[must_use]
    pub fn is_recursable(&self, recursion_level: i64) -> bool {
        if !self.status.is_valid() {
            return false;
        }
        if recursion_level >= 0 && i64::from(self.depth) >= recursion_level {
            return false;
        }
        self.scheme.is_extractable()
    }

    /// The immutable wire snapshot handed to loggers — never the live item.
    #[must_use]
    pub fn to_wire(&self) -> UrlItemWire {
        UrlItemWire {
            parent_url: self.origin.as_ref().map(|o| o.parent_url.clone()),
            raw_ref: self.raw_ref.clone(),
            canonical: self.canonical.clone(),
            anchor: self.anchor.clone(),
            name: self.canonical.clone().unwrap_or_else(|| self.raw_ref.clone()),
            valid: self.status.is_valid(),
            cached: self.cached,
            messages: self.messages.clone(),
            warnings: self.warnings.clone(),
            size: self.size,
            duration: self.duration,
            depth: self.depth,
        }
    }
}

/// An immutable, cheaply cloned snapshot of a `UrlItem` for logging. Every
/// formatter is built from exactly these fields.
#[derive(Debug, Clone)]
pub struct UrlItemWire {
    pub parent_url: Option<String>,
    pub raw_ref: String,
    pub canonical: Option<String>,
    pub anchor: Option<String>,
    pub name: String,
    pub valid: bool,
    pub cached: bool,
    pub messages: Vec<String>,
    pub warnings: Vec<Warning>,
    pub size: Option<u64>,
    pub duration: Option<Duration>,
    pub depth: u32,
}

impl UrlItemWire {
    #[must_use]
    pub fn has_unignored_warnings(&self, ignored: &[crate::WarningTag]) -> bool {
        self.warnings.iter().any(|w| !ignored.contains(&w.tag))
    }
}
