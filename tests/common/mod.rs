//! Shared fixtures for the end-to-end engine scenarios in `tests/suite`.

#![allow(dead_code)]

use linkchecker_config::CliArgs;

/// A [`CliArgs`] with every optional flag at its zero value, seeded with
/// `seeds`. Mirrors `linkchecker-config`'s own `cli_with_seeds` test helper
/// since `CliArgs` has no `Default` impl (every field is meaningful to
/// `clap`).
pub fn cli_with_seeds(seeds: &[&str]) -> CliArgs {
    CliArgs {
        seeds: seeds.iter().map(|s| (*s).to_string()).collect(),
        recursion_level: None,
        threads: None,
        timeout: Some(5),
        user_agent: None,
        no_warnings: false,
        ignore_url: Vec::new(),
        no_follow_url: Vec::new(),
        check_extern: false,
        output: Vec::new(),
        debug: Vec::new(),
        cookies: false,
        save_cookies: None,
        config: None,
    }
}
