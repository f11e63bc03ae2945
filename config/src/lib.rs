//! CLI parsing, config-file loading and the merged runtime [`Options`] for
//! LinkChecker.

mod auth;
mod cli;
mod cookies;
mod errors;
mod file;
mod formatter_spec;
mod options;

pub use auth::{AuthConfig, AuthEntry, LoginBootstrap};
pub use cli::{CliArgs, ExitCode};
pub use cookies::CookiePolicy;
pub use errors::ConfigError;
pub use file::{ConfigFile, default_config_path};
pub use formatter_spec::{Destination, FormatterSpec, OutputFormat};
pub use options::{DEFAULT_RECURSION_LEVEL, DEFAULT_REDIRECT_LIMIT, DEFAULT_STATUS_WAIT_SECS, DEFAULT_THREADS, DEFAULT_TIMEOUT_SECS, DEFAULT_WAIT_SECS, Options};
