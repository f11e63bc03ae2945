//! Per-scheme URL checkers.
//!
//! Each handler checks one URL and reports a [`http::CheckVerdict`] plus a
//! [`common::CheckOutcome`] (content for extraction, size, final URL).
//! HTTP/HTTPS goes through `reqwest`; the rest are hand-rolled clients over
//! `tokio::net` because no crate in this workspace's dependency tree
//! targets FTP, NNTP, or telnet, and mailto needs nothing beyond a DNS
//! lookup. The shared `CheckVerdict` type lives in `http` because it was
//! authored there first — every other handler imports it from there rather
//! than duplicating the enum.

pub mod common;
pub mod errors;
pub mod file;
pub mod ftp;
pub mod http;
pub mod mailto;
pub mod nntp;
pub mod retry;
pub mod telnet;

pub use common::{CheckContext, CheckOutcome, Credentials};
pub use errors::ProtocolError;
pub use file::FileHandler;
pub use ftp::FtpHandler;
pub use http::{CheckVerdict, HttpHandler, fetch_robots_txt};
pub use mailto::MailtoHandler;
pub use nntp::NntpHandler;
pub use telnet::TelnetHandler;
