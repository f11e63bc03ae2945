//! robots.txt cache and rule evaluation, per the de-facto standard.
//! Fetched through the same HTTP handler as ordinary checks, with its
//! `bypass_robots` request option set so the fetch doesn't recursively
//! consult robots.txt for itself.

use std::collections::HashMap;
use std::sync::Arc;

use linkchecker_types::HostKey;
use tokio::sync::{Mutex, Notify};

/// One `User-agent` block's `Disallow`/`Allow` prefixes, de-facto-standard
/// semantics: longest matching prefix wins; an empty `Disallow` value
/// means "allow everything."
#[derive(Debug, Clone, Default)]
struct RuleSet {
    disallow: Vec<String>,
    allow: Vec<String>,
}

/// Parsed robots.txt, or `None` if the fetch failed (treated as "no
/// restrictions", the de-facto default when a site has no robots.txt).
#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    wildcard: RuleSet,
}

impl RobotsRules {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut blocks: Vec<(Vec<String>, RuleSet)> = Vec::new();
        let mut current_agents: Vec<String> = Vec::new();
        let mut current_rules = RuleSet::default();
        let mut in_block = false;

        for raw_line in text.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim().to_string();

            match key.as_str() {
                "user-agent" => {
                    if in_block && !current_agents.is_empty() {
                        blocks.push((std::mem::take(&mut current_agents), std::mem::take(&mut current_rules)));
                    }
                    current_agents.push(value.to_ascii_lowercase());
                    in_block = true;
                }
                "disallow" => {
                    if !value.is_empty() {
                        current_rules.disallow.push(value);
                    } else {
                        // An empty Disallow means "allow everything" for
                        // this agent block; recorded as a zero-length
                        // allow prefix so it always matches.
                        current_rules.allow.push(String::new());
                    }
                }
                "allow" => current_rules.allow.push(value),
                _ => {}
            }
        }
        if !current_agents.is_empty() {
            blocks.push((current_agents, current_rules));
        }

        let wildcard = blocks
            .into_iter()
            .find(|(agents, _)| agents.iter().any(|a| a == "*"))
            .map_or_else(RuleSet::default, |(_, rules)| rules);

        Self { wildcard }
    }

    /// True if `path` is allowed. Longest matching prefix among
    /// `Allow`/`Disallow` wins; ties favor `Allow` (more permissive),
    /// matching the de-facto standard's common implementation.
    #[must_use]
    pub fn is_allowed(&self, path: &str) -> bool {
        let best_disallow = self.wildcard.disallow.iter().filter(|p| path.starts_with(p.as_str())).map(String::len).max();
        let best_allow = self.wildcard.allow.iter().filter(|p| path.starts_with(p.as_str())).map(String::len).max();

        match (best_disallow, best_allow) {
            (Some(d), Some(a)) => a >= d,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

enum Slot {
    Pending(Arc<Notify>),
    Done(Arc<RobotsRules>),
}

#[derive(Default)]
pub struct RobotsCache {
    slots: Mutex<HashMap<HostKey, Slot>>,
}

impl RobotsCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch-or-reuse the robots rules for `host`. `fetch` is called at
    /// most once per host, with the same pending-placeholder pattern as
    /// [`crate::cache::UrlCache`].
    pub async fn rules_for<F, Fut>(&self, host: HostKey, fetch: F) -> Arc<RobotsRules>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Option<String>>,
    {
        loop {
            let notify = {
                let mut slots = self.slots.lock().await;
                match slots.get(&host) {
                    Some(Slot::Done(rules)) => return Arc::clone(rules),
                    Some(Slot::Pending(notify)) => Arc::clone(notify),
                    None => {
                        let notify = Arc::new(Notify::new());
                        slots.insert(host.clone(), Slot::Pending(Arc::clone(&notify)));
                        drop(slots);

                        let text = fetch().await;
                        let rules = Arc::new(text.as_deref().map_or_else(RobotsRules::default, RobotsRules::parse));
                        let mut slots = self.slots.lock().await;
                        slots.insert(host.clone(), Slot::Done(Arc::clone(&rules)));
                        notify.notify_waiters();
                        return rules;
                    }
                }
            };
            notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallowed_prefix_is_denied() {
        let rules = RobotsRules::parse("User-agent: *\nDisallow: /private\n");
        assert!(!rules.is_allowed("/private/secret"));
        assert!(rules.is_allowed("/public"));
    }

    #[test]
    fn empty_disallow_value_allows_everything() {
        let rules = RobotsRules::parse("User-agent: *\nDisallow:\n");
        assert!(rules.is_allowed("/anything"));
    }

    #[test]
    fn longer_allow_overrides_shorter_disallow() {
        let rules = RobotsRules::parse("User-agent: *\nDisallow: /docs\nAllow: /docs/public\n");
        assert!(rules.is_allowed("/docs/public/page"));
        assert!(!rules.is_allowed("/docs/private"));
    }

    #[test]
    fn missing_robots_txt_means_no_restriction() {
        let rules = RobotsRules::default();
        assert!(rules.is_allowed("/anything"));
    }

    #[test]
    fn non_wildcard_agent_blocks_are_ignored() {
        let rules = RobotsRules::parse("User-agent: Googlebot\nDisallow: /\n");
        assert!(rules.is_allowed("/anything"));
    }

    #[tokio::test]
    async fn second_caller_reuses_the_first_fetch() {
        let cache = RobotsCache::new();
        let host = HostKey::new(linkchecker_types::Scheme::Http, "example.test", 80);

        let first = cache.rules_for(host.clone(), || async { Some("User-agent: *\nDisallow: /x\n".to_string()) }).await;
        let second = cache.rules_for(host, || async { panic!("should not be called again") }).await;

        assert!(Arc::ptr_eq(&first, &second));
    }
}
