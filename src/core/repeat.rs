//! Cancellable scheduled repeat for held controls
//!
//! While a +/- control stays pressed, its delta is reapplied on a fixed
//! interval. [`start`] fires the action immediately (press feedback) and
//! then periodically; [`RepeatHandle::cancel`] guarantees that no firing
//! happens after it returns: the firing path and cancellation serialize on
//! the same lock, so cancel cannot complete while an action is mid-flight.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running repeat; dropping it cancels.
pub struct RepeatHandle {
    cancelled: Arc<Mutex<bool>>,
    task: JoinHandle<()>,
}

/// Start repeating `action` every `interval`, firing once immediately.
pub fn start<F>(interval: Duration, mut action: F) -> RepeatHandle
where
    F: FnMut() + Send + 'static,
{
    let cancelled = Arc::new(Mutex::new(false));
    let flag = cancelled.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let guard = flag.lock();
            if *guard {
                break;
            }
            action();
            drop(guard);
        }
    });

    RepeatHandle { cancelled, task }
}

impl RepeatHandle {
    /// Stop the repeat.
    ///
    /// When this returns, the action will not fire again: taking the lock
    /// waits out any in-flight firing, and every later tick observes the
    /// flag before calling the action.
    pub fn cancel(&self) {
        *self.cancelled.lock() = true;
        self.task.abort();
    }
}

impl Drop for RepeatHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fires_immediately_then_repeats() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        let handle = start(Duration::from_millis(10), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
        assert!(count.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_no_firing_after_cancel_returns() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        let handle = start(Duration::from_millis(5), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.cancel();
        let frozen = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), frozen);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_drop_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        {
            let _handle = start(Duration::from_millis(5), move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        let frozen = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), frozen);
    }
}
