//! `ftp://` handler, RFC 959 control-channel commands over a raw
//! `tokio::net::TcpStream`. No FTP crate appears anywhere in this
//! workspace's dependency corpus, so the handful of commands LinkChecker
//! actually needs (`USER`, `PASS`, `CWD`, `SIZE`) are hand-rolled here,
//! matching the shape of the other hand-rolled protocol clients
//! (`linkchecker-protocols::nntp`) rather than pulling in a dependency for
//! three request/reply pairs.

use std::time::{Duration, Instant};

use linkchecker_types::WarningTag;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::common::{CheckContext, CheckOutcome};
use crate::errors::ProtocolError;
use crate::http::CheckVerdict;

const DEFAULT_FTP_PORT: u16 = 21;

pub struct FtpHandler;

impl FtpHandler {
    /// # Errors
    /// [`ProtocolError::UrlParse`] if `canonical_url` isn't a valid `ftp:`
    /// URL.
    pub async fn check(&self, canonical_url: &str, ctx: &CheckContext) -> Result<(CheckOutcome, CheckVerdict), ProtocolError> {
        let started = Instant::now();
        let url = url::Url::parse(canonical_url)?;
        let host = url.host_str().unwrap_or_default().to_string();
        let port = url.port().unwrap_or(DEFAULT_FTP_PORT);

        let (user, password) = ctx
            .credentials
            .as_ref()
            .map_or(("anonymous".to_string(), "anonymous@".to_string()), |c| (c.user.clone(), c.password.clone()));

        match run_session(&host, port, &user, &password, url.path(), ctx.timeout).await {
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

async fn run_session(host: &str, port: u16, user: &str, password: &str, path: &str, timeout: Duration) -> Result<(), CheckVerdict> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect((host, port)))
        .await
        .map_err(|_| CheckVerdict::invalid(WarningTag::UrlTimeout, "FTP connect timed out"))?
        .map_err(|err| CheckVerdict::invalid(WarningTag::UrlFtpError, format!("connect failed: {err}")))?;

    let mut reader = BufReader::new(stream);

    let greeting = read_response(&mut reader).await?;
    expect_code(&greeting, &[220])?;

    send_command(&mut reader, &format!("USER {user}")).await?;
    let resp = read_response(&mut reader).await?;
    if resp.code == 331 {
        send_command(&mut reader, &format!("PASS {password}")).await?;
        let resp = read_response(&mut reader).await?;
        expect_login(&resp)?;
    } else {
        expect_login(&resp)?;
    }

    let trimmed = path.trim_start_matches('/');
    let (dir, leaf) = trimmed.rsplit_once('/').unwrap_or(("", trimmed));

    if !dir.is_empty() {
        send_command(&mut reader, &format!("CWD /{dir}")).await?;
        let resp = read_response(&mut reader).await?;
        if resp.code == 550 {
            return Err(CheckVerdict::invalid(WarningTag::UrlUnreachable, resp.text));
        }
    }

    if !leaf.is_empty() {
        send_command(&mut reader, &format!("SIZE {leaf}")).await?;
        let resp = read_response(&mut reader).await?;
        if resp.code == 550 {
            // Some servers refuse SIZE on directories; fall back to a CWD
            // probe before declaring the path unreachable.
            send_command(&mut reader, &format!("CWD /{trimmed}")).await?;
            let cwd_resp = read_response(&mut reader).await?;
            if cwd_resp.code == 550 {
                return Err(CheckVerdict::invalid(WarningTag::UrlUnreachable, resp.text));
            }
        }
    }

    let _ = send_command(&mut reader, "QUIT").await;
    Ok(())
}

fn expect_login(resp: &Response) -> Result<(), CheckVerdict> {
    if resp.code == 230 {
        Ok(())
    } else if resp.code == 530 {
        Err(CheckVerdict::invalid(WarningTag::UrlAuthRequired, resp.text.clone()))
    } else {
        Err(CheckVerdict::invalid(WarningTag::UrlFtpError, resp.text.clone()))
    }
}

fn expect_code(resp: &Response, codes: &[u32]) -> Result<(), CheckVerdict> {
    if codes.contains(&resp.code) {
        Ok(())
    } else {
        Err(CheckVerdict::invalid(WarningTag::UrlFtpError, resp.text.clone()))
    }
}

struct Response {
    code: u32,
    text: String,
}

async fn send_command(reader: &mut BufReader<TcpStream>, command: &str) -> Result<(), CheckVerdict> {
    reader
        .get_mut()
        .write_all(format!("{command}\r\n").as_bytes())
        .await
        .map_err(|err| CheckVerdict::invalid(WarningTag::UrlFtpError, format!("write failed: {err}")))
}

/// RFC 959 multi-line replies start with `XXX-` and end with a line
/// starting `XXX ` bearing the same code.
async fn read_response(reader: &mut BufReader<TcpStream>) -> Result<Response, CheckVerdict> {
    let mut full_text = String::new();
    let mut code = None;

    loop {
        let mut line = String::new();
        let n = reader
            .read_line(&mut line)
            .await
            .map_err(|err| CheckVerdict::invalid(WarningTag::UrlFtpError, format!("read failed: {err}")))?;
        if n == 0 {
            return Err(CheckVerdict::invalid(WarningTag::UrlFtpError, "connection closed unexpectedly"));
        }
        full_text.push_str(line.trim_end());
        full_text.push(' ');

        let Some(line_code) = line.get(..3).and_then(|s| s.parse::<u32>().ok()) else {
            continue;
        };
        code.get_or_insert(line_code);

        if line.as_bytes().get(3) == Some(&b' ') {
            break;
        }
    }

    Ok(Response {
        code: code.unwrap_or(0),
        text: full_text.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    #[test]
    fn reply_code_is_the_first_three_digits() {
        let line = "220 Welcome\r\n";
        let code: u32 = line[..3].parse().unwrap();
        assert_eq!(code, 220);
    }

    #[test]
    fn multiline_reply_continuation_uses_a_dash() {
        let continuation = "150-Here comes the listing\r\n";
        assert_eq!(continuation.as_bytes()[3], b'-');
        let terminal = "226 Transfer complete\r\n";
        assert_eq!(terminal.as_bytes()[3], b' ');
    }
}
