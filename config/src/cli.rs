//! Command-line surface.
//!
//! This is deliberately a thin argument grammar: everything it parses is
//! merged into an [`crate::Options`] by [`crate::Options::resolve`], which
//! also layers in the config file. No checking logic lives here.

use std::path::PathBuf;

use clap::Parser;

/// Validate the hyperlink graph reachable from one or more seed URLs.
#[derive(Debug, Parser)]
#[command(name = "linkchecker", version, about)]
pub struct CliArgs {
    /// One or more seed URLs, or `@file` to read newline-separated seeds
    /// from `file`.
    #[arg(required = true)]
    pub seeds: Vec<String>,

    /// Maximum recursion depth. -1 means unbounded.
    #[arg(short = 'r', long = "recursion-level", alias = "recursionlevel")]
    pub recursion_level: Option<i64>,

    /// Worker count. 0 runs the check engine synchronously on one task,
    /// useful for debugging and deterministic tests.
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Per-request timeout, in seconds.
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Override the User-Agent sent with every HTTP(S) request.
    #[arg(long = "user-agent")]
    pub user_agent: Option<String>,

    /// Suppress warnings from the log output entirely.
    #[arg(long = "no-warnings")]
    pub no_warnings: bool,

    /// Classify URLs matching PAT as extern. May be given multiple times.
    #[arg(long = "ignore-url", value_name = "PAT")]
    pub ignore_url: Vec<String>,

    /// Match URLs against PAT but do not recurse into them even if intern.
    #[arg(long = "no-follow-url", value_name = "PAT")]
    pub no_follow_url: Vec<String>,

    /// Also check extern links, one level deep.
    #[arg(long = "check-extern")]
    pub check_extern: bool,

    /// Add an output formatter as `format/destination` (e.g. `text/-` for
    /// stdout, `html/report.html`). May be given multiple times.
    #[arg(short = 'F', long = "output", value_name = "FORMAT/DESTINATION")]
    pub output: Vec<String>,

    /// Enable debug logging for a named area. May be given multiple times.
    #[arg(short = 'D', long = "debug", value_name = "AREA")]
    pub debug: Vec<String>,

    /// Send cookies recorded by a previous `--save-cookies` run.
    #[arg(long = "cookies")]
    pub cookies: bool,

    /// Save cookies collected during this run to PATH.
    #[arg(long = "save-cookies", value_name = "PATH")]
    pub save_cookies: Option<PathBuf>,

    /// Configuration file path. Defaults to
    /// `$HOME/.linkchecker/linkcheckerrc` if present.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    AllValid = 0,
    SomeInvalid = 1,
    UsageOrConfigError = 2,
    Interrupted = 3,
}

impl ExitCode {
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}
