//! Cookie persistence policy for `--cookies`/`--save-cookies`: cookies are
//! sent per origin/path matching rules, and storing a cookie implies
//! sending it.

use std::path::PathBuf;

/// What the engine should do with cookies for this run.
#[derive(Debug, Clone, Default)]
pub struct CookiePolicy {
    /// Load and send cookies recorded by a previous `--save-cookies` run.
    pub send_saved: bool,
    /// Persist cookies accumulated during this run to this path on exit.
    pub save_to: Option<PathBuf>,
}

impl CookiePolicy {
    #[must_use]
    pub fn new(send_saved: bool, save_to: Option<PathBuf>) -> Self {
        Self { send_saved, save_to }
    }

    /// A jar is needed at all if either side of the policy is active.
    #[must_use]
    pub fn jar_required(&self) -> bool {
        self.send_saved || self.save_to.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_needs_no_jar() {
        assert!(!CookiePolicy::default().jar_required());
    }

    #[test]
    fn save_to_triggers_jar_requirement() {
        let policy = CookiePolicy::new(false, Some(PathBuf::from("cookies.txt")));
        assert!(policy.jar_required());
    }
}
