//! The incoming queue: seeds flow in, workers pop and push children back,
//! and the director owns worker lifecycle, terminating once the queue
//! drains and no worker is active.
//!
//! `in_flight` is the piece that makes termination detection correct: a
//! queue that is merely empty doesn't mean the crawl is done, because a
//! worker mid-check is about to enqueue children. Termination requires
//! both "queue empty" and "nothing in flight" at once, sampled under the
//! same lock so the two can't be observed inconsistently.

use std::collections::VecDeque;
use std::sync::Arc;

use linkchecker_types::UrlItem;
use tokio::sync::{Mutex, Notify};

pub struct WorkQueue {
    items: Mutex<VecDeque<UrlItem>>,
    in_flight: Mutex<usize>,
    item_available: Notify,
    drained: Notify,
}

impl WorkQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            in_flight: Mutex::new(0),
            item_available: Notify::new(),
            drained: Notify::new(),
        }
    }

    pub async fn push(&self, item: UrlItem) {
        self.items.lock().await.push_back(item);
        self.item_available.notify_one();
    }

    pub async fn push_many(&self, new_items: Vec<UrlItem>) {
        if new_items.is_empty() {
            return;
        }
        let mut items = self.items.lock().await;
        let count = new_items.len();
        items.extend(new_items);
        drop(items);
        for _ in 0..count {
            self.item_available.notify_one();
        }
    }

    /// Dequeue one item, marking it in-flight. Returns `None` once the
    /// queue is drained and nothing remains in flight — the worker's
    /// signal to stop.
    pub async fn pop(&self) -> Option<UrlItem> {
        loop {
            // Register both `Notified` futures before re-checking state below,
            // not after: a `notify_waiters()` call racing with this check would
            // otherwise land between the check and the registration and be
            // missed entirely, hanging this worker forever. `Notified` records
            // the notification count at creation time, so a notify that lands
            // any time between these two lines and the eventual `.await` is
            // still observed.
            let item_available = self.item_available.notified();
            let drained = self.drained.notified();

            {
                let mut items = self.items.lock().await;
                if let Some(item) = items.pop_front() {
                    drop(items);
                    *self.in_flight.lock().await += 1;
                    return Some(item);
                }
            }

            if *self.in_flight.lock().await == 0 {
                self.drained.notify_waiters();
                return None;
            }

            tokio::select! {
                () = item_available => {}
                () = drained => {}
            }
        }
    }

    /// Mark the most recently popped item as finished. Must be called
    /// exactly once per successful `pop`.
    pub async fn finish_one(&self) {
        let mut in_flight = self.in_flight.lock().await;
        *in_flight -= 1;
        if *in_flight == 0 {
            let items = self.items.lock().await;
            if items.is_empty() {
                self.drained.notify_waiters();
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn in_flight(&self) -> usize {
        *self.in_flight.lock().await
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper so workers can share one queue via `Arc`.
pub type SharedQueue = Arc<WorkQueue>;

#[cfg(test)]
mod tests {
    use super::*;
    use linkchecker_types::UrlItem;

    fn item(raw: &str) -> UrlItem {
        UrlItem::new(raw.to_string(), None, 0, None)
    }

    #[tokio::test]
    async fn pop_returns_none_once_drained_with_nothing_in_flight() {
        let queue = WorkQueue::new();
        assert_eq!(queue.pop().await, None);
    }

    #[tokio::test]
    async fn popped_item_counts_as_in_flight_until_finished() {
        let queue = WorkQueue::new();
        queue.push(item("a")).await;

        let popped = queue.pop().await;
        assert!(popped.is_some());
        assert_eq!(queue.in_flight().await, 1);

        queue.finish_one().await;
        assert_eq!(queue.in_flight().await, 0);
    }

    #[tokio::test]
    async fn a_worker_waiting_on_an_empty_queue_wakes_when_a_child_is_pushed() {
        let queue = Arc::new(WorkQueue::new());
        queue.push(item("parent")).await;
        let popped = queue.pop().await.unwrap();
        assert_eq!(popped.raw_ref, "parent");

        let waiter = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };

        tokio::task::yield_now().await;
        queue.push(item("child")).await;
        queue.finish_one().await;

        let result = waiter.await.unwrap();
        assert_eq!(result.unwrap().raw_ref, "child");
    }
}
