//! The at-most-once result cache: a URL item is cached iff its canonical
//! key already had a recorded result when it was dequeued. The mechanism
//! is a pending placeholder plus a condition variable, so that two workers
//! racing to check the same canonical URL don't both perform the I/O — the
//! loser waits for the winner's result instead.
//!
//! This is the async analogue of that pattern: `tokio::sync::Mutex` guards
//! the slot table, `tokio::sync::Notify` replaces the condition variable.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use linkchecker_types::{CacheKey, CheckStatus, Warning};
use tokio::sync::{Mutex, Notify};

/// The subset of a checked `UrlItem` that is shared across every item with
/// the same cache key.
#[derive(Debug, Clone)]
pub struct CachedResult {
    pub status: CheckStatus,
    pub messages: Vec<String>,
    pub warnings: Vec<Warning>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub duration: Option<Duration>,
    pub final_url: Option<String>,
}

enum Slot {
    Pending(Arc<Notify>),
    Done(Arc<CachedResult>),
}

#[derive(Default)]
pub struct UrlCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl UrlCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(result, was_cached)`. If `key` has no recorded result yet,
    /// this caller becomes the one that runs `compute` and publishes it;
    /// any other caller for the same key blocks on the first caller's
    /// `Notify` instead of running `compute` itself.
    pub async fn get_or_compute<F, Fut>(&self, key: CacheKey, compute: F) -> (Arc<CachedResult>, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CachedResult>,
    {
        loop {
            let notify = {
                let mut slots = self.slots.lock().await;
                match slots.get(&key) {
                    Some(Slot::Done(result)) => return (Arc::clone(result), true),
                    Some(Slot::Pending(notify)) => Arc::clone(notify),
                    None => {
                        let notify = Arc::new(Notify::new());
                        slots.insert(key.clone(), Slot::Pending(Arc::clone(&notify)));
                        drop(slots);

                        let result = Arc::new(compute().await);
                        let mut slots = self.slots.lock().await;
                        slots.insert(key.clone(), Slot::Done(Arc::clone(&result)));
                        notify.notify_waiters();
                        return (result, false);
                    }
                }
            };

            notify.notified().await;
        }
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample() -> CachedResult {
        CachedResult {
            status: CheckStatus::Valid,
            messages: Vec::new(),
            warnings: Vec::new(),
            content_type: None,
            size: None,
            duration: None,
            final_url: None,
        }
    }

    #[tokio::test]
    async fn first_caller_computes_second_caller_is_cached() {
        let cache = UrlCache::new();
        let key = CacheKey::from_normalized("http://example.test/".to_string());

        let (_, first_cached) = cache.get_or_compute(key.clone(), || async { sample() }).await;
        let (_, second_cached) = cache.get_or_compute(key, || async { sample() }).await;

        assert!(!first_cached);
        assert!(second_cached);
    }

    #[tokio::test]
    async fn concurrent_callers_for_the_same_key_compute_exactly_once() {
        let cache = Arc::new(UrlCache::new());
        let key = CacheKey::from_normalized("http://example.test/race".to_string());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute(key, || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        sample()
                    })
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
