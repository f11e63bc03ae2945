//! Supported URL schemes and their default ports.

use std::fmt;

/// A scheme LinkChecker knows how to dispatch a protocol handler for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
    Ftp,
    File,
    Mailto,
    News,
    Nntp,
    Telnet,
    /// Any scheme without a dedicated handler. Checking such a URL is a
    /// fatal condition (`url-unsupported-scheme`), not a crash.
    Unsupported,
}

impl Scheme {
    /// Parse a scheme string as it appears before `:` in a URL, lowercased.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "http" => Self::Http,
            "https" => Self::Https,
            "ftp" => Self::Ftp,
            "file" => Self::File,
            "mailto" => Self::Mailto,
            "news" => Self::News,
            "nntp" => Self::Nntp,
            "telnet" => Self::Telnet,
            _ => Self::Unsupported,
        }
    }

    /// Default port elided from the cache key.
    #[must_use]
    pub const fn default_port(self) -> Option<u16> {
        match self {
            Self::Http => Some(80),
            Self::Https => Some(443),
            Self::Ftp => Some(21),
            Self::Nntp | Self::News => Some(119),
            Self::Telnet => Some(23),
            Self::File | Self::Mailto | Self::Unsupported => None,
        }
    }

    /// Whether this scheme's content can ever be recursed into for child
    /// links (HTML/CSS extraction only applies to http(s) and file).
    #[must_use]
    pub const fn is_extractable(self) -> bool {
        matches!(self, Self::Http | Self::Https | Self::File)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::Ftp => "ftp",
            Self::File => "file",
            Self::Mailto => "mailto",
            Self::News => "news",
            Self::Nntp => "nntp",
            Self::Telnet => "telnet",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Scheme::parse("HTTP"), Scheme::Http);
        assert_eq!(Scheme::parse("HtTpS"), Scheme::Https);
    }

    #[test]
    fn unknown_scheme_is_unsupported() {
        assert_eq!(Scheme::parse("gopher"), Scheme::Unsupported);
    }

    #[test]
    fn default_ports_match_spec() {
        assert_eq!(Scheme::Http.default_port(), Some(80));
        assert_eq!(Scheme::Https.default_port(), Some(443));
        assert_eq!(Scheme::Ftp.default_port(), Some(21));
        assert_eq!(Scheme::Nntp.default_port(), Some(119));
        assert_eq!(Scheme::Telnet.default_port(), Some(23));
        assert_eq!(Scheme::File.default_port(), None);
    }
}
