//! Intern/extern classification: `classify(canonical, config)`.

use linkchecker_types::{Classification, PatternSet};

/// First match wins against ordered intern patterns, then extern patterns;
/// `negate` flips a match. Unmatched URLs default to extern.
///
/// Intern patterns are checked in full before any extern pattern is
/// consulted, so a URL matching both always classifies as intern.
#[must_use]
pub fn classify(canonical: &str, intern: &PatternSet, extern_set: &PatternSet) -> Classification {
    if intern.first_match(canonical).is_some() {
        return Classification::Intern;
    }
    if extern_set.first_match(canonical).is_some() {
        return Classification::Extern;
    }
    Classification::Extern
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkchecker_types::PatternEntry;

    fn set(patterns: &[&str]) -> PatternSet {
        PatternSet::new(
            patterns
                .iter()
                .map(|p| PatternEntry::compile(p, false).unwrap())
                .collect(),
        )
    }

    #[test]
    fn intern_match_wins_over_extern_match() {
        let intern = set(&["example\\.test"]);
        let extern_set = set(&["example\\.test/private"]);
        let result = classify("http://example.test/private", &intern, &extern_set);
        assert_eq!(result, Classification::Intern);
    }

    #[test]
    fn unmatched_defaults_to_extern() {
        let intern = set(&["^never$"]);
        let extern_set = PatternSet::default();
        let result = classify("http://other.test/", &intern, &extern_set);
        assert_eq!(result, Classification::Extern);
    }

    #[test]
    fn negated_intern_pattern_excludes_a_match() {
        let intern = set(&["!admin"]);
        let extern_set = PatternSet::default();
        assert_eq!(
            classify("http://example.test/admin/panel", &intern, &extern_set),
            Classification::Extern
        );
        assert_eq!(
            classify("http://example.test/home", &intern, &extern_set),
            Classification::Intern
        );
    }

    #[test]
    fn classification_is_stable_under_renormalization() {
        let intern = set(&["example\\.test"]);
        let extern_set = PatternSet::default();

        let once = crate::normalize("HTTP://Example.TEST:80/a", None).unwrap();
        let twice = crate::normalize(&once.canonical, None).unwrap();

        assert_eq!(
            classify(&once.canonical, &intern, &extern_set),
            classify(&twice.canonical, &intern, &extern_set)
        );
    }
}
