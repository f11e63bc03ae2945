//! Shared handler plumbing: the check context every handler receives and
//! the outcome every handler produces. Every scheme handler shares this
//! contract.

use std::time::Duration;

/// Credentials to offer if the server challenges for Basic/Digest auth.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

/// Everything a handler needs besides the URL itself: timeouts, identity,
/// and policy that doesn't belong on `UrlItem`.
#[derive(Debug, Clone)]
pub struct CheckContext {
    pub user_agent: String,
    pub timeout: Duration,
    pub credentials: Option<Credentials>,
    /// Skip the robots.txt gate for this one request. Set when the handler
    /// call *is* the robots.txt fetch itself.
    pub bypass_robots: bool,
    /// Whether the caller will want to extract child links from this URL if
    /// it turns out to carry an extractable content type. The director
    /// sets this from the same depth/classification/scheme
    /// checks that gate recursion, so a HEAD-only request never pays for a
    /// body it would discard.
    pub need_content: bool,
}

impl Default for CheckContext {
    fn default() -> Self {
        Self {
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(60),
            credentials: None,
            bypass_robots: false,
            need_content: false,
        }
    }
}

/// What a successful (or at least executed) check produced, beyond the
/// `valid`/`invalid` verdict already folded into the `UrlItem` by the
/// handler. `content` feeds the extraction stage; handlers that never
/// extract (ftp, mailto, nntp, telnet) leave it `None`.
#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    pub content: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub duration: Duration,
    /// The URL actually reached, if different from the one requested (a
    /// redirect chain's final hop).
    pub final_url: Option<String>,
}
