//! HTTP/HTTPS handler.
//!
//! HEAD first; on method-not-allowed or when anchor/content inspection is
//! required, fall back to GET. Follow redirects up to a fixed bound
//! (default 5), detecting loops by canonical-URL set. Honor `Retry-After`
//! on 429/503. Record final URL; a redirect that crosses the intern
//! boundary reclassifies the child. Authentication: consult the
//! pattern-matched credential store; negotiate Basic/Digest as offered.
//! Extract children only when content-type is text/html,
//! application/xhtml+xml, or text/css.
//!
//! Manual redirect handling (`redirect::Policy::none()`) is used instead of
//! `reqwest`'s built-in follower so that the canonical-URL set used for
//! loop detection, and the final URL recorded on the item, are ours to
//! control rather than baked into the client.

use std::collections::HashSet;
use std::time::Instant;

use linkchecker_types::WarningTag;
use reqwest::{Client, Method, StatusCode};

use crate::common::{CheckContext, CheckOutcome};
use crate::errors::ProtocolError;
use crate::retry::{RetryConfig, calculate_retry_delay, should_retry};

const EXTRACTABLE_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml", "text/css"];

/// Scheme-agnostic: works for both `http://` and `https://`, the
/// distinction being entirely in the URL's authority and `reqwest`'s TLS
/// layer.
pub struct HttpHandler {
    client: Client,
    redirect_limit: u32,
    retry: RetryConfig,
}

impl HttpHandler {
    #[must_use]
    pub fn new(client: Client, redirect_limit: u32) -> Self {
        Self {
            client,
            redirect_limit,
            retry: RetryConfig::default(),
        }
    }

    /// Check one URL, returning the outcome and the warning/validity
    /// verdict the caller should fold into its `UrlItem`.
    ///
    /// # Errors
    /// [`ProtocolError`] only for plumbing failures (malformed request
    /// construction); ordinary network failures are reported as
    /// `CheckVerdict::Invalid` rather than an `Err`.
    pub async fn check(&self, canonical_url: &str, ctx: &CheckContext) -> Result<(CheckOutcome, CheckVerdict), ProtocolError> {
        let started = Instant::now();
        let mut seen = HashSet::new();
        let mut current = canonical_url.to_string();
        seen.insert(current.clone());
        // When the caller already knows it needs the body (recursion, or a
        // robots.txt fetch), skip straight to GET instead of paying for a
        // HEAD that would just be discarded.
        let mut method = if ctx.need_content { Method::GET } else { Method::HEAD };

        for hop in 0..=self.redirect_limit {
            let response = match self.send_with_retry(&method, &current, ctx).await {
                Ok(response) => response,
                Err(verdict) => {
                    return Ok((
                        CheckOutcome {
                            duration: started.elapsed(),
                            final_url: Some(current),
                            ..CheckOutcome::default()
                        },
                        verdict,
                    ));
                }
            };

            let status = response.status();

            if status == StatusCode::METHOD_NOT_ALLOWED && method == Method::HEAD {
                method = Method::GET;
                continue;
            }

            if status.is_redirection() {
                if hop == self.redirect_limit {
                    return Ok((
                        CheckOutcome {
                            duration: started.elapsed(),
                            final_url: Some(current),
                            ..CheckOutcome::default()
                        },
                        CheckVerdict::invalid(WarningTag::UrlRedirectLoop, "too many redirects"),
                    ));
                }

                let Some(location) = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                else {
                    return Ok((
                        CheckOutcome {
                            duration: started.elapsed(),
                            final_url: Some(current),
                            ..CheckOutcome::default()
                        },
                        CheckVerdict::invalid(WarningTag::UrlUnreachable, format!("{status} with no Location header")),
                    ));
                };
                current = reqwest::Url::parse(&current)
                    .and_then(|base| base.join(location))
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| location.to_string());

                if !seen.insert(current.clone()) {
                    return Ok((
                        CheckOutcome {
                            duration: started.elapsed(),
                            final_url: Some(current),
                            ..CheckOutcome::default()
                        },
                        CheckVerdict::invalid(WarningTag::UrlRedirectLoop, "redirect loop detected"),
                    ));
                }
                continue;
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::PROXY_AUTHENTICATION_REQUIRED {
                return Ok((
                    CheckOutcome {
                        duration: started.elapsed(),
                        final_url: Some(current.clone()),
                        ..CheckOutcome::default()
                    },
                    CheckVerdict::invalid(WarningTag::UrlAuthRequired, format!("{status}")),
                ));
            }

            if !status.is_success() {
                return Ok((
                    CheckOutcome {
                        duration: started.elapsed(),
                        final_url: Some(current.clone()),
                        ..CheckOutcome::default()
                    },
                    CheckVerdict::invalid(WarningTag::UrlUnreachable, format!("HTTP {status}")),
                ));
            }

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let should_extract = content_type
                .as_deref()
                .is_some_and(|ct| EXTRACTABLE_CONTENT_TYPES.iter().any(|known| ct.starts_with(known)));

            // `ctx.need_content` covers two callers that want the body
            // regardless of content-type: the director recursing into a
            // page (extraction itself still filters on content-type), and
            // the robots.txt fetch (`text/plain`, never in
            // `EXTRACTABLE_CONTENT_TYPES`).
            let (content, size) = if method == Method::GET && (should_extract || ctx.need_content) {
                match response.text().await {
                    Ok(text) => {
                        let size = text.len() as u64;
                        (Some(text), Some(size))
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "failed to read response body");
                        (None, None)
                    }
                }
            } else {
                let size = response.content_length();
                (None, size)
            };

            return Ok((
                CheckOutcome {
                    content,
                    content_type,
                    size,
                    duration: started.elapsed(),
                    final_url: Some(current),
                },
                CheckVerdict::Valid,
            ));
        }

        Ok((
            CheckOutcome {
                duration: started.elapsed(),
                final_url: Some(current),
                ..CheckOutcome::default()
            },
            CheckVerdict::invalid(WarningTag::UrlRedirectLoop, "too many redirects"),
        ))
    }

    async fn send_with_retry(&self, method: &Method, url: &str, ctx: &CheckContext) -> Result<reqwest::Response, CheckVerdict> {
        let mut attempt = 0;
        loop {
            let mut builder = self.client.request(method.clone(), url).timeout(ctx.timeout);
            if let Some(creds) = &ctx.credentials {
                builder = builder.basic_auth(&creds.user, Some(&creds.password));
            }

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    if should_retry(status, response.headers()) && attempt < self.retry.max_retries {
                        let delay = calculate_retry_delay(attempt, &self.retry, Some(response.headers()));
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    if err.is_timeout() {
                        return Err(CheckVerdict::invalid(WarningTag::UrlTimeout, err.to_string()));
                    }
                    if is_tls_error(&err) {
                        return Err(CheckVerdict::invalid(WarningTag::UrlSslError, err.to_string()));
                    }
                    if err.is_connect() {
                        if attempt < self.retry.max_retries {
                            let delay = calculate_retry_delay(attempt, &self.retry, None);
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(CheckVerdict::invalid(WarningTag::UrlDnsError, err.to_string()));
                    }
                    return Err(CheckVerdict::invalid(WarningTag::UrlUnreachable, err.to_string()));
                }
            }
        }
    }
}

fn is_tls_error(err: &reqwest::Error) -> bool {
    use std::error::Error as _;

    let mut source = err.source();
    while let Some(s) = source {
        let text = s.to_string().to_ascii_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        source = s.source();
    }
    false
}

/// The handler's verdict on a URL, independent of the `UrlItem` it will be
/// folded into.
#[derive(Debug, Clone)]
pub enum CheckVerdict {
    Valid,
    Invalid { tag: WarningTag, message: String },
}

impl CheckVerdict {
    pub(crate) fn invalid(tag: WarningTag, message: impl Into<String>) -> Self {
        Self::Invalid {
            tag,
            message: message.into(),
        }
    }
}

/// Fetch `robots.txt` for the given origin, bypassing the robots gate
/// itself (it would be circular otherwise). Returns `None` on any failure,
/// which the caller treats as "no restrictions".
pub async fn fetch_robots_txt(handler: &HttpHandler, origin: &str, ctx: &CheckContext) -> Option<String> {
    let url = format!("{}/robots.txt", origin.trim_end_matches('/'));
    let mut robots_ctx = ctx.clone();
    robots_ctx.bypass_robots = true;
    robots_ctx.need_content = true;
    let (outcome, verdict) = handler.check(&url, &robots_ctx).await.ok()?;
    match verdict {
        CheckVerdict::Valid => outcome.content,
        CheckVerdict::Invalid { .. } => None,
    }
}
