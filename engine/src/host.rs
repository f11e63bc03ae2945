//! Per-host politeness: a slot tracks last-access/wait-until timestamps
//! and a discard-on-error flag, serializing each host to at most one
//! in-flight request, spaced `wait` apart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use linkchecker_types::HostKey;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Slot {
    /// Exclusive access for this host; also the point other workers queue
    /// up on so requests to the same host never overlap.
    gate: Arc<Mutex<()>>,
    last_access: Option<Instant>,
    /// Set after a failed request — a host already known to be down this
    /// run skips its wait, so failures don't slow the rest of the crawl to
    /// the same cadence as successes.
    discard_wait: bool,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            gate: Arc::new(Mutex::new(())),
            last_access: None,
            discard_wait: false,
        }
    }
}

pub struct HostSlots {
    wait: Duration,
    slots: Mutex<HashMap<HostKey, Slot>>,
}

impl HostSlots {
    #[must_use]
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire this host's politeness slot, sleeping if `wait` hasn't
    /// elapsed since the last access, then hold the per-host gate for the
    /// duration of `body`.
    pub async fn run<F, Fut, T>(&self, host: HostKey, body: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = (T, bool)>,
    {
        let gate = {
            let mut slots = self.slots.lock().await;
            slots.entry(host.clone()).or_default().gate.clone()
        };
        let _permit = gate.lock().await;

        let (delay, discard) = {
            let slots = self.slots.lock().await;
            slots.get(&host).map_or((Duration::ZERO, false), |slot| {
                let delay = slot.last_access.map_or(Duration::ZERO, |last| self.wait.saturating_sub(last.elapsed()));
                (delay, slot.discard_wait)
            })
        };

        if !discard && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let (result, failed) = body().await;

        let mut slots = self.slots.lock().await;
        let slot = slots.entry(host).or_default();
        slot.last_access = Some(Instant::now());
        slot.discard_wait = failed;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkchecker_types::Scheme;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn second_access_waits_out_the_politeness_delay() {
        let slots = HostSlots::new(Duration::from_millis(50));
        let host = HostKey::new(Scheme::Http, "example.test", 80);

        let started = Instant::now();
        slots.run(host.clone(), || async { ((), false) }).await;
        slots.run(host, || async { ((), false) }).await;
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn requests_to_different_hosts_do_not_wait_on_each_other() {
        let slots = HostSlots::new(Duration::from_millis(200));
        let a = HostKey::new(Scheme::Http, "a.test", 80);
        let b = HostKey::new(Scheme::Http, "b.test", 80);

        let started = Instant::now();
        slots.run(a, || async { ((), false) }).await;
        slots.run(b, || async { ((), false) }).await;
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn discard_on_error_skips_the_wait() {
        let slots = HostSlots::new(Duration::from_millis(500));
        let host = HostKey::new(Scheme::Http, "flaky.test", 80);
        let calls = AtomicU32::new(0);

        slots
            .run(host.clone(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                ((), true)
            })
            .await;

        let started = Instant::now();
        slots.run(host, || async { ((), false) }).await;
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
