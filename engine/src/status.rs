//! Periodic progress snapshot: a dedicated timer producing periodic
//! `(checked, in_progress, queued, elapsed)` samples for a status sink,
//! never blocking workers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use crate::queue::SharedQueue;

/// One `(checked, in_progress, queued, elapsed)` sample.
#[derive(Debug, Clone, Copy)]
pub struct StatusSnapshot {
    pub checked: u64,
    pub in_progress: usize,
    pub queued: usize,
    pub elapsed: Duration,
}

/// Where status snapshots go. The director's default writes a line to
/// stderr; tests substitute a recording sink.
pub trait StatusSink: Send + Sync {
    fn report(&self, snapshot: StatusSnapshot);
}

/// Default sink: one line to stderr per sample.
pub struct StderrStatusSink;

impl StatusSink for StderrStatusSink {
    fn report(&self, snapshot: StatusSnapshot) {
        eprintln!(
            "checked={} in_progress={} queued={} elapsed={:.1}s",
            snapshot.checked,
            snapshot.in_progress,
            snapshot.queued,
            snapshot.elapsed.as_secs_f64()
        );
    }
}

/// Aggregate counts the director updates as items finish. The status task
/// only reads them, so a worker's hot path pays nothing beyond an atomic
/// store.
#[derive(Default)]
pub struct Counters {
    pub checked: AtomicU64,
    pub valid: AtomicU64,
    pub invalid: AtomicU64,
    pub cached: AtomicU64,
}

/// Runs until the task is aborted, sampling the queue and counters into
/// `sink` every `period`. The director spawns this and aborts it once the
/// crawl finishes — it never decides termination itself.
pub async fn run(queue: SharedQueue, counters: Arc<Counters>, sink: Arc<dyn StatusSink>, period: Duration) {
    let start = Instant::now();
    let mut ticker = tokio::time::interval(period);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        sink.report(StatusSnapshot {
            checked: counters.checked.load(Ordering::Relaxed),
            in_progress: queue.in_flight().await,
            queued: queue.len().await,
            elapsed: start.elapsed(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSink {
        seen: Mutex<Vec<StatusSnapshot>>,
    }

    impl StatusSink for RecordingSink {
        fn report(&self, snapshot: StatusSnapshot) {
            self.seen.lock().unwrap().push(snapshot);
        }
    }

    #[tokio::test]
    async fn reports_a_snapshot_every_tick() {
        let queue = Arc::new(crate::queue::WorkQueue::new());
        let counters = Arc::new(Counters::default());
        counters.checked.store(3, Ordering::Relaxed);
        let sink = Arc::new(RecordingSink { seen: Mutex::new(Vec::new()) });

        let handle = tokio::spawn(run(Arc::clone(&queue), counters, Arc::clone(&sink) as Arc<dyn StatusSink>, Duration::from_millis(5)));
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.abort();

        let seen = sink.seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert_eq!(seen[0].checked, 3);
    }
}
