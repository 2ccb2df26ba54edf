//! Drain group — a counter incremented when a task starts and decremented
//! when it finishes, awaited by the supervisor at shutdown.
//!
//! Rust has no direct equivalent of a Go `sync.WaitGroup` in the standard
//! library, so this is a small `Notify`-backed counter built on the same
//! primitives used elsewhere for background tasks (`tokio::sync`). `add`
//! must be called before a task is spawned and `done` exactly once on
//! every exit path — a task that observes cancellation before starting
//! must still call `done` (see DESIGN.md's note on the double-`Done()`
//! bug this guards against).
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Clone)]
pub struct DrainGroup {
    inner: Arc<Inner>,
}

struct Inner {
    count: AtomicU64,
    notify: Notify,
}

impl DrainGroup {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                count: AtomicU64::new(0),
                notify: Notify::new(),
            }),
        }
    }

    /// Register one unit of outstanding work. Call before spawning the task.
    pub fn add(&self) {
        self.inner.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Mark one unit of work as finished. Must be called exactly once per
    /// `add`, on every exit path (including cancellation).
    pub fn done(&self) {
        let prev = self.inner.count.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(prev > 0, "DrainGroup::done called more times than add");
        if prev == 1 {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn count(&self) -> u64 {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// Wait until the outstanding count reaches zero.
    pub async fn wait(&self) {
        loop {
            if self.inner.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            let notified = self.inner.notify.notified();
            // Re-check after subscribing to avoid missing a notification
            // that fired between the load above and the subscribe.
            if self.inner.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Default for DrainGroup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_returns_immediately_when_empty() {
        let dg = DrainGroup::new();
        tokio::time::timeout(Duration::from_millis(50), dg.wait())
            .await
            .expect("wait should not block with zero count");
    }

    #[tokio::test]
    async fn wait_blocks_until_done() {
        let dg = DrainGroup::new();
        dg.add();
        assert_eq!(dg.count(), 1);

        let waiter = dg.clone();
        let handle = tokio::spawn(async move {
            waiter.wait().await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        dg.done();
        tokio::time::timeout(Duration::from_millis(200), handle)
            .await
            .expect("wait should complete after done")
            .unwrap();
        assert_eq!(dg.count(), 0);
    }
}
