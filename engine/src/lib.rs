//! The check engine: director, worker pool, URL cache, robots cache, host
//! politeness, cookie jar and status reporter.
//!
//! [`run`] is the crate's only entry point: given a resolved
//! [`linkchecker_config::Options`], it drives seeds through to a drained
//! queue (or an honored shutdown signal) and returns a [`Summary`] plus
//! whether the run was interrupted.

mod cache;
mod cookies;
mod director;
mod dispatch;
mod errors;
mod host;
mod queue;
mod robots;
mod status;

pub use cookies::CookieJar;
pub use director::{Director, RunOutcome, run};
pub use errors::EngineError;
pub use status::{Counters, StatusSink, StatusSnapshot, StderrStatusSink};
