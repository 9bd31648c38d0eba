//! libshelf Scheduler Library
//!
//! Scheduling primitives for the on-demand preview subsystem.
//!
//! This crate provides the two trigger paths that decide when a library
//! item's preview gets rendered (scroll-driven visibility and debounced
//! pointer hover), plus the render request queue, cancellation tokens, and
//! the readiness gate that tolerates renderer backends which are still
//! initializing. Everything here is tick-driven state over plain data; the
//! rendering itself lives elsewhere.
//!
//! # Example
//!
//! ```
//! use libshelf_scheduler::{RenderQueue, RequestOrigin, SlotRect, VisibilityTracker};
//!
//! let mut tracker = VisibilityTracker::new();
//! let mut queue = RenderQueue::new();
//!
//! let slot = tracker.register(SlotRect::new(0.0, 0.0, 200.0, 150.0));
//!
//! // The slot scrolled into view: fire its one-shot load.
//! let viewport = SlotRect::new(0.0, 0.0, 800.0, 600.0);
//! for due in tracker.due_slots(&viewport) {
//!     queue.submit(due as u64, RequestOrigin::Slot(due));
//! }
//!
//! let request = queue.next_request().unwrap();
//! assert_eq!(request.item_id, slot as u64);
//! ```

mod cancel;
mod hover;
mod queue;
mod readiness;
mod visibility;

// Re-export public API
pub use cancel::CancellationToken;
pub use hover::{HoverController, HoverFire, HoverState, HOVER_DEBOUNCE};
pub use queue::{
    QueueStats, RenderQueue, RenderRequest, RequestId, RequestOrigin, RequestPriority, SlotId,
};
pub use readiness::{
    wait_ready, GateStatus, ReadinessGate, READY_POLL_INTERVAL, READY_TIMEOUT,
};
pub use visibility::{
    LoadOutcome, SlotRect, SlotState, VisibilityTracker, DEFAULT_SCROLL_MARGIN,
    DEFAULT_VISIBLE_FRACTION,
};
