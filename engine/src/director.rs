//! The director/orchestrator: owns every cache, the queue, the worker pool
//! and the shutdown flag, and drives the
//! `new -> queued -> aggregated -> checked -> logged -> done` state machine
//! for each `UrlItem`.
//!
//! Scheduling model: `tokio::task`s stand in for OS threads, with
//! `threads == 0` running the very same worker loop inline on the caller's
//! task instead of spawning — a "synchronous" mode for deterministic tests
//! and debugging.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use futures_util::FutureExt;

use linkchecker_config::Options;
use linkchecker_core::{classify, normalize};
use linkchecker_logger::{FilterPolicy, LogFanout, Summary};
use linkchecker_protocols::{CheckContext, CheckOutcome, CheckVerdict, Credentials, fetch_robots_txt};
use linkchecker_types::{
    CacheKey, CheckStatus, Classification, HostKey, Origin, PatternEntry, PatternSet, Scheme, UrlItem, Warning, WarningTag,
};

use crate::cache::{CachedResult, UrlCache};
use crate::cookies::CookieJar;
use crate::dispatch::Handlers;
use crate::errors::EngineError;
use crate::host::HostSlots;
use crate::queue::{SharedQueue, WorkQueue};
use crate::robots::RobotsCache;
use crate::status::{Counters, StatusSink, StderrStatusSink};

/// What a completed (or interrupted) run produced.
pub struct RunOutcome {
    pub summary: Summary,
    pub interrupted: bool,
}

/// Everything the worker loop needs, owned for the run's lifetime: global
/// config and every cache, consolidated into one value owned by the
/// director instead of scattered module-level state.
pub struct Director {
    options: Options,
    intern_patterns: PatternSet,
    cache: UrlCache,
    robots: RobotsCache,
    hosts: HostSlots,
    queue: SharedQueue,
    handlers: Handlers,
    logger: Arc<LogFanout>,
    counters: Arc<Counters>,
    shutdown: Arc<AtomicBool>,
}

/// Run a full check from resolved `options`, returning once the queue has
/// drained (or a shutdown signal was honored). This is `linkchecker-cli`'s
/// only entry point into the engine.
///
/// # Errors
/// [`EngineError::NoSeeds`] if `options.seeds` resolves to nothing
/// (`@file` references that are empty don't independently fail — only an
/// end result of zero seeds does); [`EngineError::ClientBuild`] if the
/// shared HTTP client can't be constructed; [`EngineError::Io`] if a
/// `@file` seed reference can't be read.
pub async fn run(options: Options) -> Result<RunOutcome, EngineError> {
    let seeds = resolve_seeds(&options.seeds)?;
    if seeds.is_empty() {
        return Err(EngineError::NoSeeds);
    }

    let intern_patterns = build_intern_patterns(&seeds);

    let cookie_jar = options.cookies.jar_required().then(|| {
        Arc::new(match &options.cookies.save_to {
            Some(_) if options.cookies.send_saved => CookieJar::new(),
            _ => CookieJar::new(),
        })
    });
    // `--cookies` loads a jar saved by a previous `--save-cookies` run from
    // the same path; both flags share one on-disk format.
    let cookie_jar = match (cookie_jar, &options.cookies.save_to) {
        (Some(_), Some(path)) if options.cookies.send_saved => std::fs::read_to_string(path)
            .ok()
            .map_or_else(|| Arc::new(CookieJar::new()), |text| Arc::new(CookieJar::load(&text))),
        (jar, _) => jar.unwrap_or_else(|| Arc::new(CookieJar::new())),
    };

    let mut client_builder = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(options.timeout_secs))
        .user_agent(options.user_agent.clone());
    if options.cookies.jar_required() {
        client_builder = client_builder.cookie_provider(Arc::clone(&cookie_jar) as Arc<dyn reqwest::cookie::CookieStore>);
    }
    let client = client_builder.build()?;

    if let Some(login) = &options.auth.login
        && !login.url.is_empty()
    {
        if let Err(err) = crate::cookies::login(&client, login).await {
            tracing::warn!(%err, "login bootstrap failed");
        }
    }

    // `news:<group>` URLs carry no server authority of their own; resolve
    // the default server from the `NNTP_SERVER` environment variable
    // rather than invent a new config surface for it.
    let nntp_server = std::env::var("NNTP_SERVER").unwrap_or_default();
    let handlers = Handlers::new(client, options.redirect_limit, nntp_server);

    let loggers = options.formatters.iter().map(linkchecker_logger::formats::build).collect();
    let policy = FilterPolicy {
        complete: false,
        verbose: false,
        warnings_enabled: !options.no_warnings,
        ignored: options.ignorewarnings.clone(),
    };
    let logger = Arc::new(LogFanout::new(loggers, policy));

    let director = Arc::new(Director {
        queue: Arc::new(WorkQueue::new()),
        cache: UrlCache::new(),
        robots: RobotsCache::new(),
        hosts: HostSlots::new(Duration::from_secs(options.wait_secs)),
        handlers,
        logger,
        counters: Arc::new(Counters::default()),
        shutdown: Arc::new(AtomicBool::new(false)),
        intern_patterns,
        options,
    });

    director.logger.start().await;

    let initial: Vec<UrlItem> = seeds.into_iter().map(|raw| UrlItem::new(raw, None, 0, None)).collect();
    director.queue.push_many(initial).await;

    let status_sink: Arc<dyn StatusSink> = Arc::new(StderrStatusSink);
    let status_period = Duration::from_secs(director.options.status_wait_secs).max(Duration::from_millis(1));
    let status_handle = tokio::spawn(crate::status::run(
        Arc::clone(&director.queue),
        Arc::clone(&director.counters),
        status_sink,
        status_period,
    ));

    let shutdown_flag = Arc::clone(&director.shutdown);
    let signal_handle = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_flag.store(true, Ordering::Relaxed);
        }
    });

    let started = Instant::now();
    if director.options.is_synchronous() {
        worker_loop(Arc::clone(&director)).await;
    } else {
        let mut handles = Vec::with_capacity(director.options.threads);
        for _ in 0..director.options.threads {
            handles.push(tokio::spawn(worker_loop(Arc::clone(&director))));
        }
        for handle in handles {
            let _ = handle.await;
        }
    }
    let elapsed = started.elapsed();

    status_handle.abort();
    signal_handle.abort();

    if let Some(path) = &director.options.cookies.save_to {
        let jar_text = cookie_jar.dump();
        if let Err(err) = linkchecker_utils::atomic_write_with_options(
            path,
            jar_text.as_bytes(),
            linkchecker_utils::AtomicWriteOptions {
                mode: linkchecker_utils::PersistMode::SensitiveOwnerOnly,
                ..Default::default()
            },
        ) {
            tracing::warn!(%err, path = %path.display(), "failed to persist cookie jar");
        }
    }

    let summary = Summary {
        checked: director.counters.checked.load(Ordering::Relaxed),
        valid: director.counters.valid.load(Ordering::Relaxed),
        invalid: director.counters.invalid.load(Ordering::Relaxed),
        cached: director.counters.cached.load(Ordering::Relaxed),
        elapsed,
    };
    director.logger.end(&summary).await;

    Ok(RunOutcome {
        summary,
        interrupted: director.shutdown.load(Ordering::Relaxed),
    })
}

/// One worker's life: pop, check, log, repeat until the queue drains or
/// shutdown is observed. Called inline once for `threads == 0`, spawned
/// `threads` times otherwise — the same function either way.
async fn worker_loop(director: Arc<Director>) {
    loop {
        if director.shutdown.load(Ordering::Relaxed) {
            return;
        }
        let Some(mut item) = director.queue.pop().await else { return };
        if AssertUnwindSafe(process(&mut item, &director)).catch_unwind().await.is_err() {
            tracing::error!(url = %item.raw_ref, "worker panicked while checking url");
            item.mark_invalid(WarningTag::UrlUnreachable, "internal error while checking url");
        }
        director.record(&item);
        director.logger.log_url(&item.to_wire()).await;
        director.queue.finish_one().await;
    }
}

/// `queued -> aggregated -> checked`. Resolves the item's canonical form,
/// consults the at-most-once cache (which itself performs the robots
/// check, politeness wait, protocol dispatch and child extraction on a
/// cache miss), and folds the shared result onto `item`.
async fn process(item: &mut UrlItem, director: &Director) {
    let normalized = match normalize(&item.raw_ref, item.base_url.as_deref()) {
        Ok(n) => n,
        Err(err) => {
            item.mark_invalid(WarningTag::UrlInvalid, err.to_string());
            return;
        }
    };

    item.canonical = Some(normalized.canonical.clone());
    item.scheme = normalized.scheme;
    item.anchor = normalized.anchor;
    item.classification = classify(&normalized.canonical, &director.intern_patterns, &director.options.extern_patterns);

    if matches!(item.scheme, Scheme::Unsupported) {
        item.mark_invalid(
            WarningTag::UrlUnsupportedScheme,
            format!("no handler for scheme in {}", normalized.canonical),
        );
        return;
    }

    let key = CacheKey::from_normalized(normalized.canonical.clone());
    item.cache_key = Some(key.clone());

    let host_key = host_key_for(item.scheme, &normalized.canonical);
    let depth = item.depth;
    let classification = item.classification;
    let scheme = item.scheme;
    let canonical = normalized.canonical.clone();

    let (result, cached) = director
        .cache
        .get_or_compute(key, move || async move {
            director.check_and_extract(scheme, &canonical, host_key, depth, classification).await
        })
        .await;

    item.cached = cached;
    item.status = result.status;
    item.messages = result.messages.clone();
    item.warnings = result.warnings.clone();
    item.content_type = result.content_type.clone();
    item.size = result.size;
    item.duration = result.duration;
}

impl Director {
    fn record(&self, item: &UrlItem) {
        self.counters.checked.fetch_add(1, Ordering::Relaxed);
        if item.status.is_valid() {
            self.counters.valid.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.invalid.fetch_add(1, Ordering::Relaxed);
        }
        if item.cached {
            self.counters.cached.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn build_context(&self, canonical: &str, need_content: bool) -> CheckContext {
        let credentials = self
            .options
            .auth
            .credentials_for(canonical)
            .map(|(user, password)| Credentials {
                user: user.to_string(),
                password: password.to_string(),
            });
        CheckContext {
            user_agent: self.options.user_agent.clone(),
            timeout: Duration::from_secs(self.options.timeout_secs),
            credentials,
            bypass_robots: false,
            need_content,
        }
    }

    /// `aggregated -> checked`: robots gate, then politeness-gated fetch,
    /// then (on a valid, recursable result) child extraction and enqueue.
    /// Runs exactly once per cache key — this is the compute closure
    /// [`UrlCache::get_or_compute`] calls only for the first caller, so
    /// extraction happening here rather than in `process` is what keeps it
    /// to at most one fetch per canonical key.
    async fn check_and_extract(
        &self,
        scheme: Scheme,
        canonical: &str,
        host_key: Option<HostKey>,
        depth: u32,
        classification: Classification,
    ) -> CachedResult {
        let need_content = should_recurse(
            scheme,
            classification,
            self.options.check_extern,
            depth,
            self.options.recursion_level,
            canonical,
            &self.options.no_follow_patterns,
        );
        let ctx = self.build_context(canonical, need_content);

        let (outcome, verdict) = if matches!(scheme, Scheme::Http | Scheme::Https) && host_key.is_some() {
            let host = host_key.clone().unwrap();
            let rules = self
                .robots
                .rules_for(host.clone(), || {
                    let handler = &self.handlers.http;
                    let origin = format!("{}://{}:{}", host.scheme, host.host, host.port);
                    let mut robots_ctx = ctx.clone();
                    robots_ctx.bypass_robots = true;
                    robots_ctx.need_content = true;
                    async move { fetch_robots_txt(handler, &origin, &robots_ctx).await }
                })
                .await;

            if rules.is_allowed(&url_path(canonical)) {
                self.hosts.run(host, || self.fetch(scheme, canonical, &ctx)).await
            } else {
                (
                    CheckOutcome::default(),
                    CheckVerdict::Invalid {
                        tag: WarningTag::UrlRobotsDenied,
                        message: "disallowed by robots.txt".to_string(),
                    },
                )
            }
        } else if let Some(host) = host_key {
            self.hosts.run(host, || self.fetch(scheme, canonical, &ctx)).await
        } else {
            self.dispatch_once(scheme, canonical, &ctx).await
        };

        if matches!(verdict, CheckVerdict::Valid)
            && should_recurse(scheme, classification, self.options.check_extern, depth, self.options.recursion_level, canonical, &self.options.no_follow_patterns)
            && let Some(content) = &outcome.content
        {
            let content_type = outcome.content_type.clone().unwrap_or_default();
            let base = outcome.final_url.clone().unwrap_or_else(|| canonical.to_string());
            let children: Vec<UrlItem> = linkchecker_extract::extract(&content_type, content)
                .into_iter()
                .map(|child_ref| {
                    let base_url = child_ref.base_override.clone().unwrap_or_else(|| base.clone());
                    UrlItem::new(
                        child_ref.raw_ref,
                        Some(Origin {
                            parent_url: canonical.to_string(),
                            line: child_ref.line,
                            column: child_ref.column,
                        }),
                        depth + 1,
                        Some(base_url),
                    )
                })
                .collect();
            self.queue.push_many(children).await;
        }

        to_cached_result(outcome, verdict)
    }

    async fn dispatch_once(&self, scheme: Scheme, canonical: &str, ctx: &CheckContext) -> (CheckOutcome, CheckVerdict) {
        match self.handlers.dispatch(scheme, canonical, ctx).await {
            Ok(pair) => pair,
            Err(err) => (
                CheckOutcome::default(),
                CheckVerdict::Invalid {
                    tag: WarningTag::UrlUnreachable,
                    message: err.to_string(),
                },
            ),
        }
    }

    /// Body passed to [`HostSlots::run`]: the politeness gate wants to know
    /// whether to skip the next wait — set only for connection-level
    /// failures, not ordinary 404s.
    async fn fetch(&self, scheme: Scheme, canonical: &str, ctx: &CheckContext) -> ((CheckOutcome, CheckVerdict), bool) {
        let pair = self.dispatch_once(scheme, canonical, ctx).await;
        let failed = matches!(&pair.1, CheckVerdict::Invalid { tag, .. } if is_connection_failure(*tag));
        (pair, failed)
    }
}

fn to_cached_result(outcome: CheckOutcome, verdict: CheckVerdict) -> CachedResult {
    let (status, messages, warnings) = match verdict {
        CheckVerdict::Valid => (CheckStatus::Valid, Vec::new(), Vec::new()),
        CheckVerdict::Invalid { tag, message } => (CheckStatus::Invalid, vec![message.clone()], vec![Warning::new(tag, message)]),
    };
    CachedResult {
        status,
        messages,
        warnings,
        content_type: outcome.content_type,
        size: outcome.size,
        duration: Some(outcome.duration),
        final_url: outcome.final_url,
    }
}

fn is_connection_failure(tag: WarningTag) -> bool {
    matches!(
        tag,
        WarningTag::UrlTimeout | WarningTag::UrlUnreachable | WarningTag::UrlDnsError | WarningTag::UrlSslError | WarningTag::UrlFtpError | WarningTag::UrlNntpError
    )
}

/// Host slots only apply to schemes with network authority; `file:`/
/// `mailto:` have none, and a bare `news:<group>` URL (no host component
/// at all) falls through to an un-politeness-gated dispatch.
fn host_key_for(scheme: Scheme, canonical: &str) -> Option<HostKey> {
    if !matches!(scheme, Scheme::Http | Scheme::Https | Scheme::Ftp | Scheme::Nntp | Scheme::News | Scheme::Telnet) {
        return None;
    }
    let url = url::Url::parse(canonical).ok()?;
    let host = url.host_str()?.to_string();
    let port = url.port().unwrap_or_else(|| scheme.default_port().unwrap_or(0));
    Some(HostKey::new(scheme, host, port))
}

fn url_path(canonical: &str) -> String {
    url::Url::parse(canonical).map(|u| u.path().to_string()).unwrap_or_else(|_| "/".to_string())
}

/// `logged -> done`: if valid and recursable (depth under limit, intern or
/// recursion-extern allowed, content-extractable type), enqueue children.
/// Mirrors `linkchecker_types::UrlItem::is_recursable`'s depth/scheme
/// checks (duplicated here rather than reused because at this point only
/// the parent's scalar fields, not a full `UrlItem`, are in scope — the
/// result hasn't been folded back onto the item yet) plus the
/// classification/no-follow checks.
fn should_recurse(scheme: Scheme, classification: Classification, check_extern: bool, depth: u32, recursion_level: i64, canonical: &str, no_follow: &PatternSet) -> bool {
    if !scheme.is_extractable() {
        return false;
    }
    if recursion_level >= 0 && i64::from(depth) >= recursion_level {
        return false;
    }
    if classification == Classification::Extern && !check_extern {
        return false;
    }
    no_follow.first_match(canonical).is_none()
}

/// Seeds are one or more URLs or `@file` references — a leading `@` names
/// a file of newline-separated seed URLs.
fn resolve_seeds(seeds: &[String]) -> Result<Vec<String>, EngineError> {
    let mut out = Vec::with_capacity(seeds.len());
    for seed in seeds {
        if let Some(path) = seed.strip_prefix('@') {
            let text = std::fs::read_to_string(path)?;
            out.extend(text.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string));
        } else {
            out.push(seed.clone());
        }
    }
    Ok(out)
}

/// Each seed contributes an intern pattern for its own origin: a fresh
/// run with no explicit `internlinks` configuration should still treat
/// same-site links as intern rather than defaulting everything to extern.
fn build_intern_patterns(seeds: &[String]) -> PatternSet {
    let entries = seeds
        .iter()
        .filter_map(|seed| url::Url::parse(seed).ok())
        .filter_map(|url| {
            let host = url.host_str()?;
            let origin = format!("^{}://{}", regex::escape(url.scheme()), regex::escape(host));
            PatternEntry::compile(&origin, false).ok()
        })
        .collect();
    PatternSet::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_seed_origin_becomes_an_intern_pattern() {
        let patterns = build_intern_patterns(&["http://example.test/a".to_string()]);
        assert!(patterns.first_match("http://example.test/b").is_some());
        assert!(patterns.first_match("http://other.test/").is_none());
    }

    #[test]
    fn at_file_seed_expands_to_its_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.txt");
        std::fs::write(&path, "http://a.test/\nhttp://b.test/\n").unwrap();
        let seeds = resolve_seeds(&[format!("@{}", path.display())]).unwrap();
        assert_eq!(seeds, vec!["http://a.test/", "http://b.test/"]);
    }

    #[test]
    fn recursion_is_blocked_past_the_configured_depth() {
        let no_follow = PatternSet::default();
        assert!(!should_recurse(Scheme::Http, Classification::Intern, false, 2, 2, "http://x/", &no_follow));
        assert!(should_recurse(Scheme::Http, Classification::Intern, false, 1, 2, "http://x/", &no_follow));
    }

    #[test]
    fn extern_items_do_not_recurse_unless_check_extern_is_set() {
        let no_follow = PatternSet::default();
        assert!(!should_recurse(Scheme::Http, Classification::Extern, false, 0, -1, "http://x/", &no_follow));
        assert!(should_recurse(Scheme::Http, Classification::Extern, true, 0, -1, "http://x/", &no_follow));
    }

    #[test]
    fn non_extractable_schemes_never_recurse() {
        let no_follow = PatternSet::default();
        assert!(!should_recurse(Scheme::Mailto, Classification::Intern, true, 0, -1, "mailto:a@b", &no_follow));
    }
}
