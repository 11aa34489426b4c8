//! One-shot readiness latch.
//!
//! DESIGN
//! ======
//! A single-assignment completion signal: `trip()` moves the latch from
//! pending to set exactly once, `wait()` suspends until that happens.
//! Callers arriving after the trip resolve immediately, and any number of
//! waiters may be parked at once. Backed by a `tokio::sync::watch` channel
//! whose sender never leaves the latch, so waiters cannot observe a closed
//! channel and `wait()` never errors.

use tokio::sync::watch;

pub struct Latch {
    tx: watch::Sender<bool>,
}

impl Latch {
    /// Create an untripped latch.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Trip the latch. Idempotent: tripping an already-set latch is a no-op
    /// and wakes nobody twice.
    pub fn trip(&self) {
        self.tx.send_if_modified(|set| {
            if *set {
                false
            } else {
                *set = true;
                true
            }
        });
    }

    /// Whether the latch has tripped. Monotone: never reverts to `false`.
    #[must_use]
    pub fn is_tripped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the latch trips. Resolves immediately if it already has.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        while !*rx.borrow_and_update() {
            // The sender lives in `self`, so the channel cannot close here.
            let _ = rx.changed().await;
        }
    }
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "latch_test.rs"]
mod tests;
