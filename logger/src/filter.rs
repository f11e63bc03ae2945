//! The log-filtering decision table:
//!
//! - `complete=true` → log all;
//! - else `cached ∧ valid` → skip;
//! - else `verbose=true` → log;
//! - else has unignored warnings ∧ warnings-enabled → log;
//! - else `¬valid` → log.

use linkchecker_types::{UrlItemWire, WarningTag};

#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    pub complete: bool,
    pub verbose: bool,
    pub warnings_enabled: bool,
    pub ignored: Vec<WarningTag>,
}

impl FilterPolicy {
    #[must_use]
    pub fn should_log(&self, item: &UrlItemWire) -> bool {
        if self.complete {
            return true;
        }
        if item.cached && item.valid {
            return false;
        }
        if self.verbose {
            return true;
        }
        if self.warnings_enabled && item.has_unignored_warnings(&self.ignored) {
            return true;
        }
        !item.valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn item(valid: bool, cached: bool, warnings: Vec<linkchecker_types::Warning>) -> UrlItemWire {
        UrlItemWire {
            parent_url: None,
            raw_ref: "http://example.test/".to_string(),
            canonical: Some("http://example.test/".to_string()),
            anchor: None,
            name: "http://example.test/".to_string(),
            valid,
            cached,
            messages: Vec::new(),
            warnings,
            size: None,
            duration: Some(Duration::ZERO),
            depth: 0,
        }
    }

    #[test]
    fn complete_logs_everything() {
        let policy = FilterPolicy {
            complete: true,
            ..FilterPolicy::default()
        };
        assert!(policy.should_log(&item(true, true, Vec::new())));
    }

    #[test]
    fn cached_valid_is_skipped_by_default() {
        let policy = FilterPolicy::default();
        assert!(!policy.should_log(&item(true, true, Vec::new())));
    }

    #[test]
    fn verbose_logs_cached_valid_items_too() {
        let policy = FilterPolicy {
            verbose: true,
            ..FilterPolicy::default()
        };
        assert!(policy.should_log(&item(true, true, Vec::new())));
    }

    #[test]
    fn unignored_warning_logs_when_warnings_enabled() {
        let policy = FilterPolicy {
            warnings_enabled: true,
            ..FilterPolicy::default()
        };
        let warned = item(true, false, vec![linkchecker_types::Warning::new(WarningTag::UrlTimeout, "slow")]);
        assert!(policy.should_log(&warned));
    }

    #[test]
    fn ignored_warning_does_not_force_a_log_for_an_otherwise_valid_item() {
        let policy = FilterPolicy {
            warnings_enabled: true,
            ignored: vec![WarningTag::UrlTimeout],
            ..FilterPolicy::default()
        };
        let warned = item(true, false, vec![linkchecker_types::Warning::new(WarningTag::UrlTimeout, "slow")]);
        assert!(!policy.should_log(&warned));
    }

    #[test]
    fn invalid_items_always_log_by_default() {
        let policy = FilterPolicy::default();
        assert!(policy.should_log(&item(false, false, Vec::new())));
    }
}
