//! `telnet:` handler. A telnet link is treated as reachable once the TCP
//! handshake succeeds, so that is the entire check here: connect, then
//! close.

use std::time::Instant;

use linkchecker_types::WarningTag;
use tokio::net::TcpStream;

use crate::common::{CheckContext, CheckOutcome};
use crate::errors::ProtocolError;
use crate::http::CheckVerdict;

const DEFAULT_TELNET_PORT: u16 = 23;

pub struct TelnetHandler;

impl TelnetHandler {
    /// # Errors
    /// [`ProtocolError::UrlParse`] if `canonical_url` isn't a valid
    /// `telnet:` URL.
    pub async fn check(&self, canonical_url: &str, ctx: &CheckContext) -> Result<(CheckOutcome, CheckVerdict), ProtocolError> {
        let started = Instant::now();
        let url = url::Url::parse(canonical_url)?;
        let host = url.host_str().unwrap_or_default().to_string();
        let port = url.port().unwrap_or(DEFAULT_TELNET_PORT);

        let verdict = match tokio::time::timeout(ctx.timeout, TcpStream::connect((host.as_str(), port))).await {
            Ok(Ok(_stream)) => CheckVerdict::Valid,
            Ok(Err(err)) => CheckVerdict::invalid(WarningTag::UrlUnreachable, err.to_string()),
            Err(_) => CheckVerdict::invalid(WarningTag::UrlTimeout, "telnet connect timed out"),
        };

        Ok((
            CheckOutcome {
                duration: started.elapsed(),
                final_url: Some(canonical_url.to_string()),
                ..CheckOutcome::default()
            },
            verdict,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_invalid() {
        let handler = TelnetHandler;
        let ctx = CheckContext {
            timeout: std::time::Duration::from_millis(200),
            ..CheckContext::default()
        };
        let (_, verdict) = handler.check("telnet://127.0.0.1:1", &ctx).await.unwrap();
        assert!(matches!(verdict, CheckVerdict::Invalid { .. }));
    }
}
