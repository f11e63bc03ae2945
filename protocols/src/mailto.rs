//! `mailto:` handler. Real MX-record verification needs a DNS resolver
//! crate absent from this workspace's stack, so the domain part is instead
//! verified by a successful `tokio::net::lookup_host` (A/AAAA resolution),
//! which catches the overwhelming majority of dead mail domains without
//! adding a DNS crate.

use std::time::Instant;

use linkchecker_types::WarningTag;

use crate::common::CheckOutcome;
use crate::http::CheckVerdict;

pub struct MailtoHandler;

impl MailtoHandler {
    pub async fn check(&self, canonical_url: &str) -> (CheckOutcome, CheckVerdict) {
        let started = Instant::now();

        let Some(address) = canonical_url.strip_prefix("mailto:") else {
            return (
                CheckOutcome {
                    duration: started.elapsed(),
                    ..CheckOutcome::default()
                },
                CheckVerdict::invalid(WarningTag::UrlInvalid, "not a mailto URL"),
            );
        };
        // Strip any `?subject=...` query component before validating the
        // address itself.
        let address = address.split('?').next().unwrap_or("");

        let Some((local, domain)) = address.split_once('@') else {
            return (
                CheckOutcome {
                    duration: started.elapsed(),
                    ..CheckOutcome::default()
                },
                CheckVerdict::invalid(WarningTag::UrlInvalid, "missing @ in mailto address"),
            );
        };

        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return (
                CheckOutcome {
                    duration: started.elapsed(),
                    ..CheckOutcome::default()
                },
                CheckVerdict::invalid(WarningTag::UrlInvalid, "malformed mailto address"),
            );
        }

        match tokio::net::lookup_host((domain, 25)).await {
            Ok(mut addrs) if addrs.next().is_some() => (
                CheckOutcome {
                    duration: started.elapsed(),
                    final_url: Some(canonical_url.to_string()),
                    ..CheckOutcome::default()
                },
                CheckVerdict::Valid,
            ),
            Ok(_) | Err(_) => (
                CheckOutcome {
                    duration: started.elapsed(),
                    ..CheckOutcome::default()
                },
                CheckVerdict::invalid(WarningTag::UrlDnsError, format!("domain {domain} does not resolve")),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_address_without_at_sign_is_invalid() {
        let handler = MailtoHandler;
        let (_, verdict) = handler.check("mailto:not-an-address").await;
        assert!(matches!(verdict, CheckVerdict::Invalid { tag: WarningTag::UrlInvalid, .. }));
    }

    #[tokio::test]
    async fn empty_local_part_is_invalid() {
        let handler = MailtoHandler;
        let (_, verdict) = handler.check("mailto:@example.com").await;
        assert!(matches!(verdict, CheckVerdict::Invalid { tag: WarningTag::UrlInvalid, .. }));
    }

    #[tokio::test]
    async fn domain_without_a_dot_is_invalid() {
        let handler = MailtoHandler;
        let (_, verdict) = handler.check("mailto:user@localhost").await;
        assert!(matches!(verdict, CheckVerdict::Invalid { tag: WarningTag::UrlInvalid, .. }));
    }

    #[tokio::test]
    async fn subject_query_is_stripped_before_validation() {
        let handler = MailtoHandler;
        let (_, verdict) = handler.check("mailto:@example.com?subject=hi").await;
        assert!(matches!(verdict, CheckVerdict::Invalid { tag: WarningTag::UrlInvalid, .. }));
    }
}
