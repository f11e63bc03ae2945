//! The thread-safe result logger. A global mutex serializes `log_url(item)`.
//! Each logger formatter receives an immutable snapshot (wire form) of the
//! URL item, never the live item.
//!
//! [`Logger`] is the `start`/`log`/`end` interface every formatter
//! implements; [`LogFanout`] is the mutex-serialized dispatcher the engine
//! actually holds, and [`formats::build`] turns a resolved
//! `linkchecker_config::FormatterSpec` into one.

pub mod formats;

mod errors;
mod filter;
mod sink;

use std::time::Duration;

use linkchecker_types::UrlItemWire;
use tokio::sync::Mutex;

pub use errors::LoggerError;
pub use filter::FilterPolicy;

/// Aggregate counts and elapsed time handed to every formatter's `end()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summary {
    pub checked: u64,
    pub valid: u64,
    pub invalid: u64,
    pub cached: u64,
    pub elapsed: Duration,
}

/// One output sink. Implementors are never called concurrently with
/// themselves — [`LogFanout`] holds a mutex across the whole `start`/`log`/
/// `end` lifecycle — so a formatter is free to keep plain, non-atomic
/// internal state (a `String` buffer, a node-id map, ...).
pub trait Logger: Send {
    fn start(&mut self);
    fn log(&mut self, item: &UrlItemWire);
    fn end(&mut self, summary: &Summary);
}

struct FanoutInner {
    loggers: Vec<Box<dyn Logger>>,
    policy: FilterPolicy,
}

/// The engine's single handle onto every configured formatter: one global
/// mutex across the `checked` → `logged` transition.
pub struct LogFanout {
    inner: Mutex<FanoutInner>,
}

impl LogFanout {
    #[must_use]
    pub fn new(loggers: Vec<Box<dyn Logger>>, policy: FilterPolicy) -> Self {
        Self {
            inner: Mutex::new(FanoutInner { loggers, policy }),
        }
    }

    pub async fn start(&self) {
        let mut inner = self.inner.lock().await;
        for logger in &mut inner.loggers {
            logger.start();
        }
    }

    /// Fan `item` out to every configured formatter whose filter policy
    /// admits it. Each formatter applies the same policy — there is no
    /// per-formatter override.
    pub async fn log_url(&self, item: &UrlItemWire) {
        let mut inner = self.inner.lock().await;
        if !inner.policy.should_log(item) {
            return;
        }
        for logger in &mut inner.loggers {
            logger.log(item);
        }
    }

    pub async fn end(&self, summary: &Summary) {
        let mut inner = self.inner.lock().await;
        for logger in &mut inner.loggers {
            logger.end(summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    struct RecordingLogger {
        seen: Arc<StdMutex<Vec<String>>>,
    }

    impl Logger for RecordingLogger {
        fn start(&mut self) {}
        fn log(&mut self, item: &UrlItemWire) {
            self.seen.lock().unwrap().push(item.raw_ref.clone());
        }
        fn end(&mut self, _summary: &Summary) {}
    }

    fn wire(raw_ref: &str, valid: bool, cached: bool) -> UrlItemWire {
        UrlItemWire {
            parent_url: None,
            raw_ref: raw_ref.to_string(),
            canonical: Some(raw_ref.to_string()),
            anchor: None,
            name: raw_ref.to_string(),
            valid,
            cached,
            messages: Vec::new(),
            warnings: Vec::new(),
            size: None,
            duration: None,
            depth: 0,
        }
    }

    #[tokio::test]
    async fn the_filter_policy_is_applied_once_for_every_formatter() {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let fanout = LogFanout::new(
            vec![Box::new(RecordingLogger { seen: Arc::clone(&seen) })],
            FilterPolicy::default(),
        );

        fanout.log_url(&wire("http://example.test/cached-ok", true, true)).await;
        fanout.log_url(&wire("http://example.test/broken", false, false)).await;

        assert_eq!(*seen.lock().unwrap(), vec!["http://example.test/broken"]);
    }
}
