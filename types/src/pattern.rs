//! Ordered pattern sets used for intern/extern classification, credential
//! matching and warning gating.

use regex::Regex;

/// A single compiled pattern entry.
///
/// `negate` flips the match result (used to express `!pattern`, so
/// `get_pattern("!X")` matches exactly the complement of `get_pattern("X")`).
/// `strict` is carried through for handlers that want to anchor the match
/// (full-string vs substring); `PatternSet` itself always does substring
/// search against the compiled regex.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    pub source: String,
    pub regex: Regex,
    pub negate: bool,
    pub strict: bool,
}

impl PatternEntry {
    /// Compile a pattern, recognizing a leading `!` as negation.
    ///
    /// # Errors
    /// Returns the underlying `regex` compile error if `pattern` (with the
    /// optional `!` stripped) is not a valid regular expression.
    pub fn compile(pattern: &str, strict: bool) -> Result<Self, regex::Error> {
        let (negate, body) = pattern
            .strip_prefix('!')
            .map_or((false, pattern), |rest| (true, rest));
        let regex = Regex::new(body)?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
            negate,
            strict,
        })
    }

    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        let hit = self.regex.is_match(candidate);
        hit != self.negate
    }
}

/// An ordered list of patterns; first match wins.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    entries: Vec<PatternEntry>,
}

impl PatternSet {
    #[must_use]
    pub fn new(entries: Vec<PatternEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First-match-wins lookup. Returns `None` if nothing in the set
    /// matches `candidate` (the caller applies the default policy).
    #[must_use]
    pub fn first_match(&self, candidate: &str) -> Option<&PatternEntry> {
        self.entries.iter().find(|entry| entry.matches(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negated_pattern_is_exact_complement() {
        let plain = PatternEntry::compile("example", false).unwrap();
        let negated = PatternEntry::compile("!example", false).unwrap();

        for candidate in ["example.test", "other.test", "EXAMPLE", ""] {
            assert_ne!(plain.matches(candidate), negated.matches(candidate));
        }
    }

    #[test]
    fn first_match_wins() {
        let set = PatternSet::new(vec![
            PatternEntry::compile("a", false).unwrap(),
            PatternEntry::compile("a", true).unwrap(),
        ]);
        let hit = set.first_match("banana").unwrap();
        assert!(!hit.strict);
    }
}
