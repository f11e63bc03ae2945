//! Scheme dispatch: one canonical URL in, one protocol-handler outcome out.
//! This module is the single place that picks among the per-scheme
//! handlers.

use linkchecker_types::{Scheme, WarningTag};

use linkchecker_protocols::common::{CheckContext, CheckOutcome};
use linkchecker_protocols::file::FileHandler;
use linkchecker_protocols::ftp::FtpHandler;
use linkchecker_protocols::http::{CheckVerdict, HttpHandler};
use linkchecker_protocols::mailto::MailtoHandler;
use linkchecker_protocols::nntp::NntpHandler;
use linkchecker_protocols::telnet::TelnetHandler;

use crate::errors::EngineError;

/// The handlers a director needs one of each of, shared across every
/// worker task.
pub struct Handlers {
    pub http: HttpHandler,
    pub ftp: FtpHandler,
    pub mailto: MailtoHandler,
    pub nntp: NntpHandler,
    pub telnet: TelnetHandler,
    pub file: FileHandler,
}

impl Handlers {
    #[must_use]
    pub fn new(client: reqwest::Client, redirect_limit: u32, default_nntp_server: String) -> Self {
        Self {
            http: HttpHandler::new(client, redirect_limit),
            ftp: FtpHandler,
            mailto: MailtoHandler,
            nntp: NntpHandler { default_server: default_nntp_server },
            telnet: TelnetHandler,
            file: FileHandler,
        }
    }

    /// Run the handler for `scheme` against `canonical_url`. An
    /// unsupported scheme is a fatal condition reported as
    /// `CheckVerdict::Invalid`, never an `Err` — per-URL failures always
    /// become an invalid `UrlItem`, never a propagated error.
    pub async fn dispatch(&self, scheme: Scheme, canonical_url: &str, ctx: &CheckContext) -> Result<(CheckOutcome, CheckVerdict), EngineError> {
        match scheme {
            Scheme::Http | Scheme::Https => Ok(self.http.check(canonical_url, ctx).await?),
            Scheme::Ftp => Ok(self.ftp.check(canonical_url, ctx).await?),
            Scheme::Mailto => Ok(self.mailto.check(canonical_url).await),
            Scheme::News | Scheme::Nntp => Ok(self.nntp.check(canonical_url, ctx).await?),
            Scheme::Telnet => Ok(self.telnet.check(canonical_url, ctx).await?),
            Scheme::File => Ok(self.file.check(canonical_url).await?),
            Scheme::Unsupported => Ok((
                CheckOutcome::default(),
                CheckVerdict::Invalid {
                    tag: WarningTag::UrlUnsupportedScheme,
                    message: format!("no handler for scheme in {canonical_url}"),
                },
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_scheme_is_invalid_not_an_error() {
        let handlers = Handlers::new(reqwest::Client::new(), 5, "news.example.test".to_string());
        let ctx = CheckContext::default();
        let (_, verdict) = handlers.dispatch(Scheme::Unsupported, "gopher://example.test/", &ctx).await.unwrap();
        assert!(matches!(verdict, CheckVerdict::Invalid { tag: WarningTag::UrlUnsupportedScheme, .. }));
    }
}
