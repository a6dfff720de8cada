//! Cooldown guard - a scoped, time-delayed input gate.
//!
//! Screens are often entered straight from a confirm press on the previous
//! screen; the carried-over key repeat or still-held button would otherwise
//! be misread as an action on the new screen. The guard starts locked and
//! unlocks once after a short delay, unless the owning screen closes it
//! first.
//!
//! Each screen owns its own guard instance; the lock state is never shared
//! across screens.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Unlock delay applied when the owner does not specify one.
pub const DEFAULT_UNLOCK_DELAY: Duration = Duration::from_millis(200);

struct GuardInner {
    unlocked: AtomicBool,
    closed: AtomicBool,
    cancel: CancellationToken,
}

/// A time-delayed permission gate for input handling.
///
/// Created locked by [`CooldownGuard::open`]; transitions to unlocked
/// exactly once after the delay elapses. [`CooldownGuard::close`] cancels a
/// pending unlock and pins the guard locked forever, so no callback can
/// leak into a torn-down screen.
///
/// Clones share the same gate; hand one to the dispatcher and keep one for
/// teardown.
#[derive(Clone)]
pub struct CooldownGuard {
    inner: Arc<GuardInner>,
}

impl CooldownGuard {
    /// Create a locked guard and schedule its single unlock transition.
    pub fn open(unlock_delay: Duration) -> Self {
        let inner = Arc::new(GuardInner {
            unlocked: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        });

        let task_inner = Arc::clone(&inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = task_inner.cancel.cancelled() => {}
                _ = tokio::time::sleep(unlock_delay) => {
                    // A close that raced the sleep wins: is_unlocked also
                    // consults the closed flag, so this store is inert then.
                    task_inner.unlocked.store(true, Ordering::SeqCst);
                }
            }
        });

        Self { inner }
    }

    /// Whether input may currently pass the gate.
    pub fn is_unlocked(&self) -> bool {
        !self.inner.closed.load(Ordering::SeqCst) && self.inner.unlocked.load(Ordering::SeqCst)
    }

    /// Cancel any pending unlock and force the guard locked forever.
    ///
    /// Idempotent; called from the screen's teardown path.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn starts_locked_and_unlocks_after_delay() {
        let guard = CooldownGuard::open(Duration::from_millis(200));
        assert!(!guard.is_unlocked());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!guard.is_unlocked());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(guard.is_unlocked());
    }

    #[tokio::test(start_paused = true)]
    async fn close_before_delay_prevents_unlock_permanently() {
        let guard = CooldownGuard::open(Duration::from_millis(200));
        tokio::time::sleep(Duration::from_millis(50)).await;
        guard.close();

        // Well past the original delay: the scheduled transition must not
        // have fired.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!guard.is_unlocked());
    }

    #[tokio::test(start_paused = true)]
    async fn close_after_unlock_relocks() {
        let guard = CooldownGuard::open(Duration::from_millis(200));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(guard.is_unlocked());

        guard.close();
        assert!(!guard.is_unlocked());

        // Idempotent.
        guard.close();
        assert!(!guard.is_unlocked());
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_the_gate() {
        let guard = CooldownGuard::open(Duration::from_millis(200));
        let other = guard.clone();
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(other.is_unlocked());

        other.close();
        assert!(!guard.is_unlocked());
    }
}
