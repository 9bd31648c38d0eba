//! Cancellation tokens for render requests
//!
//! Every queued render request carries a token so that a hover session can
//! cancel its request when the pointer leaves before the renderer runs.
//! The executor checks the token before invoking an adapter and drops
//! cancelled requests without doing any work.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Cancellation token for cooperative request cancellation
///
/// Clones share the same underlying flag, so the queue can hold one clone
/// while the hover session holds another.
///
/// # Example
///
/// ```
/// use libshelf_scheduler::CancellationToken;
///
/// let token = CancellationToken::new();
/// let queued = token.clone();
///
/// token.cancel();
/// assert!(queued.is_cancelled());
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new token in the non-cancelled state
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancel this token
    ///
    /// All clones observe the cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether `cancel()` has been called on this token or any clone
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
