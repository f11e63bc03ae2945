//! The closed warning-tag enumeration.
//!
//! Tags are stable identifiers: they are what `ignorewarnings` matches
//! against, and what formatters render. Never reuse a variant for a
//! different meaning once shipped.

use std::fmt;

/// A stable, user-ignorable condition attached to a checked URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WarningTag {
    UrlInvalid,
    UrlUnsupportedScheme,
    UrlRedirectLoop,
    UrlUnreachable,
    UrlTimeout,
    UrlAuthRequired,
    UrlAnchorNotFound,
    UrlRobotsDenied,
    UrlContentTooLarge,
    UrlContentTypeMismatch,
    UrlSslError,
    UrlDnsError,
    UrlFtpError,
    UrlNntpError,
    UrlHtmlSyntax,
    UrlCssSyntax,
    UrlVirusDetected,
}

impl WarningTag {
    /// All variants. Used to validate `ignorewarnings` configuration
    /// entries and to drive exhaustive tests.
    pub const ALL: &'static [Self] = &[
        Self::UrlInvalid,
        Self::UrlUnsupportedScheme,
        Self::UrlRedirectLoop,
        Self::UrlUnreachable,
        Self::UrlTimeout,
        Self::UrlAuthRequired,
        Self::UrlAnchorNotFound,
        Self::UrlRobotsDenied,
        Self::UrlContentTooLarge,
        Self::UrlContentTypeMismatch,
        Self::UrlSslError,
        Self::UrlDnsError,
        Self::UrlFtpError,
        Self::UrlNntpError,
        Self::UrlHtmlSyntax,
        Self::UrlCssSyntax,
        Self::UrlVirusDetected,
    ];

    /// The wire tag, e.g. `"url-unreachable"`. This is the string users put
    /// in `ignorewarnings` and formatters print.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UrlInvalid => "url-invalid",
            Self::UrlUnsupportedScheme => "url-unsupported-scheme",
            Self::UrlRedirectLoop => "url-redirect-loop",
            Self::UrlUnreachable => "url-unreachable",
            Self::UrlTimeout => "url-timeout",
            Self::UrlAuthRequired => "url-auth-required",
            Self::UrlAnchorNotFound => "url-anchor-not-found",
            Self::UrlRobotsDenied => "url-robots-denied",
            Self::UrlContentTooLarge => "url-content-too-large",
            Self::UrlContentTypeMismatch => "url-content-type-mismatch",
            Self::UrlSslError => "url-ssl-error",
            Self::UrlDnsError => "url-dns-error",
            Self::UrlFtpError => "url-ftp-error",
            Self::UrlNntpError => "url-nntp-error",
            Self::UrlHtmlSyntax => "url-html-syntax",
            Self::UrlCssSyntax => "url-css-syntax",
            Self::UrlVirusDetected => "url-virus-detected",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| tag.as_str() == raw)
    }
}

impl fmt::Display for WarningTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single warning attached to a `UrlItem`: a stable tag plus a
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub tag: WarningTag,
    pub text: String,
}

impl Warning {
    #[must_use]
    pub fn new(tag: WarningTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}
