//! The merged runtime configuration.
//!
//! [`Options::resolve`] layers three sources in increasing priority:
//! built-in defaults, the config file, then CLI flags ("CLI wins").

use std::path::PathBuf;

use linkchecker_types::{PatternEntry, PatternSet, WarningTag};

use crate::auth::{AuthConfig, AuthEntry, LoginBootstrap};
use crate::cli::CliArgs;
use crate::cookies::CookiePolicy;
use crate::errors::ConfigError;
use crate::file::ConfigFile;
use crate::formatter_spec::FormatterSpec;

/// Built-in default worker count.
pub const DEFAULT_THREADS: usize = 10;
/// Default per-request timeout, seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default per-host politeness delay, seconds.
pub const DEFAULT_WAIT_SECS: u64 = 0;
/// Default status-reporter tick interval, seconds.
pub const DEFAULT_STATUS_WAIT_SECS: u64 = 5;
/// Default recursion level: unbounded.
pub const DEFAULT_RECURSION_LEVEL: i64 = -1;
/// Redirect chain bound before a redirect is treated as a loop.
pub const DEFAULT_REDIRECT_LIMIT: u32 = 5;

fn default_user_agent() -> String {
    format!(
        "{}/{} (+{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        "https://github.com/linkchecker/linkchecker"
    )
}

/// Every engine-visible knob, fully resolved. Nothing downstream consults
/// the CLI or config file again once this is built.
#[derive(Debug, Clone)]
pub struct Options {
    pub seeds: Vec<String>,
    pub threads: usize,
    pub timeout_secs: u64,
    pub wait_secs: u64,
    pub status_wait_secs: u64,
    pub recursion_level: i64,
    pub redirect_limit: u32,
    pub user_agent: String,

    pub no_warnings: bool,
    pub ignorewarnings: Vec<WarningTag>,

    pub extern_patterns: PatternSet,
    pub no_follow_patterns: PatternSet,
    pub check_extern: bool,

    pub auth: AuthConfig,
    pub cookies: CookiePolicy,

    pub formatters: Vec<FormatterSpec>,
    pub debug_areas: Vec<String>,
}

impl Options {
    /// Merge CLI args with an optional config file into a fully resolved
    /// [`Options`]. `config_path`, when `None`, falls back to
    /// [`crate::file::default_config_path`] if that file exists.
    ///
    /// # Errors
    /// Any [`ConfigError`] raised while reading/parsing the config file or
    /// while compiling patterns/formatters. Configuration errors are fatal
    /// and raised before workers start.
    pub fn resolve(cli: CliArgs) -> Result<Self, ConfigError> {
        let config_path = cli
            .config
            .clone()
            .or_else(crate::file::default_config_path)
            .filter(|p| p.exists());

        let file = match config_path {
            Some(path) => Some(ConfigFile::load(&path)?),
            None => None,
        };

        Self::merge(cli, file.as_ref())
    }

    fn merge(cli: CliArgs, file: Option<&ConfigFile>) -> Result<Self, ConfigError> {
        if cli.seeds.is_empty() {
            return Err(ConfigError::NoSeeds);
        }

        let threads = cli
            .threads
            .or_else(|| file.and_then(|f| f.get("checking", "threads")?.parse().ok()))
            .unwrap_or(DEFAULT_THREADS);

        let timeout_secs = cli
            .timeout
            .or_else(|| file.and_then(|f| f.get("checking", "timeout")?.parse().ok()))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let wait_secs = file
            .and_then(|f| f.get("checking", "wait")?.parse().ok())
            .unwrap_or(DEFAULT_WAIT_SECS);

        let status_wait_secs = file
            .and_then(|f| f.get("checking", "status_wait")?.parse().ok())
            .unwrap_or(DEFAULT_STATUS_WAIT_SECS);

        let recursion_level = cli
            .recursion_level
            .or_else(|| file.and_then(|f| f.get("checking", "recursionlevel")?.parse().ok()))
            .unwrap_or(DEFAULT_RECURSION_LEVEL);

        let user_agent = cli
            .user_agent
            .clone()
            .or_else(|| file.and_then(|f| f.get("checking", "useragent")).map(str::to_string))
            .unwrap_or_else(default_user_agent);

        let no_warnings = cli.no_warnings
            || file
                .and_then(|f| f.get("output", "nowarnings"))
                .is_some_and(|v| is_truthy(v));

        let mut ignorewarnings = Vec::new();
        if let Some(f) = file {
            for raw in f.get_all("output", "ignorewarnings") {
                for piece in raw.split(',') {
                    let piece = piece.trim();
                    if piece.is_empty() {
                        continue;
                    }
                    let tag = WarningTag::parse(piece).ok_or_else(|| ConfigError::InvalidValue {
                        key: "ignorewarnings".to_string(),
                        value: piece.to_string(),
                    })?;
                    ignorewarnings.push(tag);
                }
            }
        }

        let mut extern_sources: Vec<String> = cli.ignore_url.clone();
        if let Some(f) = file {
            extern_sources.extend(f.get_all("filtering", "ignore_url").map(str::to_string));
        }
        let extern_patterns = compile_patterns(&extern_sources)?;

        let mut no_follow_sources: Vec<String> = cli.no_follow_url.clone();
        if let Some(f) = file {
            no_follow_sources.extend(f.get_all("filtering", "no_follow_url").map(str::to_string));
        }
        let no_follow_patterns = compile_patterns(&no_follow_sources)?;

        let check_extern = cli.check_extern
            || file
                .and_then(|f| f.get("filtering", "checkextern"))
                .is_some_and(is_truthy);

        let auth_entries = file.map(|f| parse_auth_entries(f)).transpose()?.unwrap_or_default();
        let login = file.and_then(parse_login_bootstrap);
        let auth = AuthConfig::build(auth_entries, login)?;

        let cookies = CookiePolicy::new(cli.cookies, cli.save_cookies.clone());

        let mut formatters = Vec::new();
        for raw in &cli.output {
            formatters.push(FormatterSpec::parse(raw)?);
        }
        if formatters.is_empty() {
            formatters.push(FormatterSpec::parse("text")?);
        }

        Ok(Self {
            seeds: cli.seeds,
            threads,
            timeout_secs,
            wait_secs,
            status_wait_secs,
            recursion_level,
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
            user_agent,
            no_warnings,
            ignorewarnings,
            extern_patterns,
            no_follow_patterns,
            check_extern,
            auth,
            cookies,
            formatters,
            debug_areas: cli.debug,
        })
    }

    /// Whether `threads == 0`, i.e. the engine should run synchronously on
    /// one task instead of spawning a worker pool.
    #[must_use]
    pub fn is_synchronous(&self) -> bool {
        self.threads == 0
    }

    /// Whether `tag` should be dropped from logger output, per
    /// `ignorewarnings`.
    #[must_use]
    pub fn is_ignored(&self, tag: WarningTag) -> bool {
        self.ignorewarnings.contains(&tag)
    }
}

fn compile_patterns(sources: &[String]) -> Result<PatternSet, ConfigError> {
    let mut entries = Vec::with_capacity(sources.len());
    for source in sources {
        let entry = PatternEntry::compile(source, false).map_err(|err| ConfigError::InvalidPattern {
            pattern: source.clone(),
            source: err,
        })?;
        entries.push(entry);
    }
    Ok(PatternSet::new(entries))
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_auth_entries(file: &ConfigFile) -> Result<Vec<AuthEntry>, ConfigError> {
    // `[authentication]` rows are written `pattern = user:password`.
    let mut entries = Vec::new();
    for (key, value) in file.section("authentication") {
        let (user, password) = value.split_once(':').ok_or_else(|| ConfigError::InvalidValue {
            key: key.clone(),
            value: value.clone(),
        })?;
        entries.push(AuthEntry {
            pattern: key.clone(),
            user: user.to_string(),
            password: password.to_string(),
        });
    }
    Ok(entries)
}

fn parse_login_bootstrap(file: &ConfigFile) -> Option<LoginBootstrap> {
    let url = file.get("authentication", "loginurl")?.to_string();
    let user = file.get("authentication", "loginuser").unwrap_or_default().to_string();
    let password = file
        .get("authentication", "loginpassword")
        .unwrap_or_default()
        .to_string();
    let user_field = file
        .get("authentication", "loginuserfield")
        .unwrap_or("login")
        .to_string();
    let password_field = file
        .get("authentication", "loginpasswordfield")
        .unwrap_or("password")
        .to_string();
    let extra_fields = file
        .get_all("authentication", "loginextrafields")
        .filter_map(|raw| raw.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    Some(LoginBootstrap {
        url,
        user,
        password,
        user_field,
        password_field,
        extra_fields,
    })
}
