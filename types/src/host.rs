//! The identity of a politeness/robots origin: `(scheme, host, port)`.

use std::fmt;

use crate::Scheme;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostKey {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl HostKey {
    #[must_use]
    pub fn new(scheme: Scheme, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme,
            host: host.into().to_ascii_lowercase(),
            port,
        }
    }

    #[must_use]
    pub fn robots_txt_path(&self) -> String {
        format!("{}://{}:{}/robots.txt", self.scheme, self.host, self.port)
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}
