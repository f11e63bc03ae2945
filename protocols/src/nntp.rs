//! `news:`/`nntp:` handler, RFC 977 control-channel commands over a raw
//! `tokio::net::TcpStream`. Same rationale as `linkchecker-protocols::ftp`:
//! no NNTP crate appears in the corpus, and the two commands LinkChecker
//! needs (`GROUP`, `ARTICLE`) don't justify one.
//!
//! `news:<group>` and `news:<message-id>` both resolve against a
//! configured default NNTP server (there being no server authority in a
//! bare `news:` URL); `nntp://host/group` carries its own authority.

use std::time::{Duration, Instant};

use linkchecker_types::WarningTag;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::common::{CheckContext, CheckOutcome};
use crate::errors::ProtocolError;
use crate::http::CheckVerdict;

const DEFAULT_NNTP_PORT: u16 = 119;

pub struct NntpHandler {
    /// Server to use for bare `news:` URLs, which carry no authority of
    /// their own.
    pub default_server: String,
}

impl NntpHandler {
    /// # Errors
    /// [`ProtocolError::UrlParse`] if `canonical_url` isn't a valid
    /// `news:`/`nntp:` URL.
    pub async fn check(&self, canonical_url: &str, ctx: &CheckContext) -> Result<(CheckOutcome, CheckVerdict), ProtocolError> {
        let started = Instant::now();
        let url = url::Url::parse(canonical_url)?;

        let (host, port, target) = if url.scheme() == "nntp" {
            (
                url.host_str().unwrap_or(&self.default_server).to_string(),
                url.port().unwrap_or(DEFAULT_NNTP_PORT),
                url.path().trim_start_matches('/').to_string(),
            )
        } else {
            (self.default_server.clone(), DEFAULT_NNTP_PORT, url.path().to_string())
        };

        match run_session(&host, port, &target, ctx.timeout).await {
            Ok(()) => Ok((
                CheckOutcome {
                    duration: started.elapsed(),
                    final_url: Some(canonical_url.to_string()),
                    ..CheckOutcome::default()
                },
                CheckVerdict::Valid,
            )),
            Err(verdict) => Ok((
                CheckOutcome {
                    duration: started.elapsed(),
                    ..CheckOutcome::default()
                },
                verdict,
            )),
        }
    }
}

async fn run_session(host: &str, port: u16, target: &str, timeout: Duration) -> Result<(), CheckVerdict> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
        .await
        .map_err(|_| CheckVerdict::invalid(WarningTag::UrlTimeout, "NNTP connect timed out"))?
        .map_err(|err| CheckVerdict::invalid(WarningTag::UrlNntpError, format!("connect failed: {err}")))?;

    let mut reader = BufReader::new(stream);
    let greeting = read_response(&mut reader).await?;
    if greeting.code != 200 && greeting.code != 201 {
        return Err(CheckVerdict::invalid(WarningTag::UrlNntpError, greeting.text));
    }

    let command = if target.contains('@') {
        format!("ARTICLE <{}>", target.trim_matches(['<', '>']))
    } else {
        format!("GROUP {target}")
    };

    reader
        .get_mut()
        .write_all(format!("{command}\r\n").as_bytes())
        .await
        .map_err(|err| CheckVerdict::invalid(WarningTag::UrlNntpError, format!("write failed: {err}")))?;

    let resp = read_response(&mut reader).await?;
    match resp.code {
        211 | 220 | 221 | 222 | 223 => {
            let _ = reader.get_mut().write_all(b"QUIT\r\n").await;
            Ok(())
        }
        411 => Err(CheckVerdict::invalid(WarningTag::UrlUnreachable, resp.text)),
        430 => Err(CheckVerdict::invalid(WarningTag::UrlUnreachable, resp.text)),
        _ => Err(CheckVerdict::invalid(WarningTag::UrlNntpError, resp.text)),
    }
}

struct Response {
    code: u32,
    text: String,
}

async fn read_response(reader: &mut BufReader<TcpStream>) -> Result<Response, CheckVerdict> {
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .await
        .map_err(|err| CheckVerdict::invalid(WarningTag::UrlNntpError, format!("read failed: {err}")))?;
    if n == 0 {
        return Err(CheckVerdict::invalid(WarningTag::UrlNntpError, "connection closed unexpectedly"));
    }
    let code = line.get(..3).and_then(|s| s.parse::<u32>().ok()).unwrap_or(0);
    Ok(Response {
        code,
        text: line.trim().to_string(),
    })
}
