//! Retry policy shared by the HTTP(S) handler: honor `Retry-After` on
//! 429/503, otherwise exponential backoff with jitter.
//!
//! Same `Retry-After`/`Retry-After-Ms` parsing, the same `x-should-retry`
//! header escape hatch, and the same down-jitter exponential backoff as a
//! provider HTTP client's retry policy, retargeted at link checking
//! (429/503 plus connection errors) instead of API rate limits.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// Retry configuration for a single URL check.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries (not counting the initial request).
    pub max_retries: u32,
    /// Initial backoff delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum backoff delay.
    pub max_delay: Duration,
    /// Jitter factor for down-jitter (0.25 = up to 25% reduction).
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter_factor: 0.25,
        }
    }
}

/// Parse `Retry-After` or `Retry-After-Ms` headers.
///
/// Returns `Some(duration)` if a valid value is found and `0 < duration <
/// 60s`. Returns `None` if headers are missing, invalid, or out of range.
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    if let Some(val) = headers.get("retry-after-ms")
        && let Ok(s) = val.to_str()
        && let Ok(ms) = s.parse::<f64>()
    {
        let duration = Duration::from_secs_f64(ms / 1000.0);
        if duration > Duration::ZERO && duration < Duration::from_secs(60) {
            return Some(duration);
        }
    }

    if let Some(val) = headers.get("retry-after")
        && let Ok(s) = val.to_str()
        && let Ok(secs) = s.parse::<u64>()
    {
        let duration = Duration::from_secs(secs);
        if duration > Duration::ZERO && duration < Duration::from_secs(60) {
            return Some(duration);
        }
    }

    None
}

/// Determine if a response status is retryable, honoring `x-should-retry`.
#[must_use]
pub fn should_retry(status: StatusCode, headers: &HeaderMap) -> bool {
    if let Some(val) = headers.get("x-should-retry")
        && let Ok(s) = val.to_str()
    {
        if s.eq_ignore_ascii_case("true") {
            return true;
        }
        if s.eq_ignore_ascii_case("false") {
            return false;
        }
    }

    matches!(status.as_u16(), 408 | 409 | 429 | 500 | 502 | 503 | 504 | 520..=599)
}

/// Compute the delay before the `backoff_step`'th retry (0-indexed).
/// Prefers a server-given `Retry-After` over the computed backoff.
#[must_use]
pub fn calculate_retry_delay(backoff_step: u32, config: &RetryConfig, headers: Option<&HeaderMap>) -> Duration {
    if let Some(headers) = headers
        && let Some(delay) = parse_retry_after(headers)
    {
        return delay;
    }

    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(backoff_step as i32);
    let capped = base.min(config.max_delay.as_secs_f64());
    let jitter = 1.0 - rand::random::<f64>() * config.jitter_factor;
    Duration::from_secs_f64(capped * jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn headers_with(name: &str, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(HeaderName::from_bytes(name.as_bytes()).unwrap(), HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn parses_retry_after_seconds() {
        let headers = headers_with("retry-after", "5");
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(5)));
    }

    #[test]
    fn retry_after_ms_takes_priority() {
        let mut headers = headers_with("retry-after", "5");
        headers.insert("retry-after-ms", HeaderValue::from_static("250"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_millis(250)));
    }

    #[test]
    fn out_of_range_retry_after_is_ignored() {
        let headers = headers_with("retry-after", "3600");
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn default_retryable_statuses() {
        let headers = HeaderMap::new();
        assert!(should_retry(StatusCode::TOO_MANY_REQUESTS, &headers));
        assert!(should_retry(StatusCode::SERVICE_UNAVAILABLE, &headers));
        assert!(!should_retry(StatusCode::NOT_FOUND, &headers));
    }

    #[test]
    fn should_retry_header_override_forces_retry() {
        let headers = headers_with("x-should-retry", "true");
        assert!(should_retry(StatusCode::NOT_FOUND, &headers));
    }

    #[test]
    fn should_retry_header_override_forbids_retry() {
        let headers = headers_with("x-should-retry", "false");
        assert!(!should_retry(StatusCode::SERVICE_UNAVAILABLE, &headers));
    }

    #[test]
    fn backoff_grows_and_stays_capped() {
        let config = RetryConfig::default();
        let first = calculate_retry_delay(0, &config, None);
        let third = calculate_retry_delay(5, &config, None);
        assert!(first <= config.max_delay);
        assert!(third <= config.max_delay);
    }
}
