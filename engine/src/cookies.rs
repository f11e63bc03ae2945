//! Runtime cookie jar and the one-shot login bootstrap: cookies are sent
//! per origin/path matching rules, and storing a cookie implies sending
//! it back on matching requests.
//!
//! Implemented as a `reqwest::cookie::CookieStore` so the same
//! `reqwest::Client` used for ordinary checks also sends and accumulates
//! cookies through `ClientBuilder::cookie_provider` — both directions go
//! through one jar, which is what gives "storing implies sending" for
//! free instead of needing a separate header plumbed through
//! `CheckContext`.
//!
//! Path scoping is not modeled: cookies are keyed by host only, and
//! `Path=`/`Domain=`/`Expires=` attributes are not parsed. Origin-only
//! scoping is a documented simplification rather than a silent gap.

use std::collections::HashMap;
use std::sync::Mutex;

use linkchecker_config::LoginBootstrap;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use url::Url;

#[derive(Debug, Clone)]
struct Cookie {
    name: String,
    value: String,
}

#[derive(Default)]
pub struct CookieJar {
    by_host: Mutex<HashMap<String, Vec<Cookie>>>,
}

impl CookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a previously saved jar. Lines are `host\tname=value`; a
    /// malformed line is skipped rather than rejected — a corrupt cookie
    /// file should never block a run.
    #[must_use]
    pub fn load(text: &str) -> Self {
        let jar = Self::new();
        for line in text.lines() {
            let Some((host, pair)) = line.split_once('\t') else { continue };
            let Some((name, value)) = pair.split_once('=') else { continue };
            jar.store(host, name.to_string(), value.to_string());
        }
        jar
    }

    /// Serialize for `--save-cookies`.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (host, cookies) in &*self.by_host.lock().unwrap() {
            for cookie in cookies {
                out.push_str(host);
                out.push('\t');
                out.push_str(&cookie.name);
                out.push('=');
                out.push_str(&cookie.value);
                out.push('\n');
            }
        }
        out
    }

    fn store(&self, host: &str, name: String, value: String) {
        let mut by_host = self.by_host.lock().unwrap();
        let cookies = by_host.entry(host.to_string()).or_default();
        if let Some(existing) = cookies.iter_mut().find(|c| c.name == name) {
            existing.value = value;
        } else {
            cookies.push(Cookie { name, value });
        }
    }
}

impl CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let Some(host) = url.host_str() else { return };
        for header in cookie_headers {
            let Ok(text) = header.to_str() else { continue };
            let first = text.split(';').next().unwrap_or(text);
            if let Some((name, value)) = first.split_once('=') {
                self.store(host, name.trim().to_string(), value.trim().to_string());
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let host = url.host_str()?;
        let by_host = self.by_host.lock().unwrap();
        let cookies = by_host.get(host)?;
        if cookies.is_empty() {
            return None;
        }
        let joined = cookies.iter().map(|c| format!("{}={}", c.name, c.value)).collect::<Vec<_>>().join("; ");
        HeaderValue::from_str(&joined).ok()
    }
}

/// Perform the one-shot login POST before crawling starts, as a
/// form-urlencoded UTF-8 body.
///
/// # Errors
/// Any `reqwest` transport or non-2xx response error. A failed login
/// bootstrap is a configuration-level problem, not a per-URL one, so the
/// caller treats it as fatal rather than folding it into a `UrlItem`.
pub async fn login(client: &reqwest::Client, bootstrap: &LoginBootstrap) -> Result<(), reqwest::Error> {
    let mut fields = vec![
        (bootstrap.user_field.as_str(), bootstrap.user.as_str()),
        (bootstrap.password_field.as_str(), bootstrap.password.as_str()),
    ];
    for (key, value) in &bootstrap.extra_fields {
        fields.push((key.as_str(), value.as_str()));
    }
    client.post(&bootstrap.url).form(&fields).send().await?.error_for_status()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_dump_and_load() {
        let jar = CookieJar::new();
        jar.store("example.test", "session".to_string(), "abc123".to_string());
        let reloaded = CookieJar::load(&jar.dump());
        let url = Url::parse("https://example.test/").unwrap();
        assert_eq!(reloaded.cookies(&url).unwrap(), "session=abc123");
    }

    #[test]
    fn set_cookies_parses_a_set_cookie_header() {
        let jar = CookieJar::new();
        let url = Url::parse("https://example.test/").unwrap();
        let header = HeaderValue::from_static("session=abc123; Path=/; HttpOnly");
        jar.set_cookies(&mut std::iter::once(&header), &url);
        assert_eq!(jar.cookies(&url).unwrap(), "session=abc123");
    }

    #[test]
    fn different_hosts_do_not_see_each_others_cookies() {
        let jar = CookieJar::new();
        jar.store("a.test", "x".to_string(), "1".to_string());
        let other = Url::parse("https://b.test/").unwrap();
        assert!(jar.cookies(&other).is_none());
    }
}
