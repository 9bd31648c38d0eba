//! Render request queue
//!
//! Orders preview render work across the two trigger paths. Hover requests
//! run before thumbnail requests because the user is actively waiting on
//! them; within a priority level requests run in submission order.
//!
//! Cancelled requests are removed lazily: `next_request` skips them and
//! counts them as cancelled, so a pointer-leave never costs a renderer
//! invocation.

use crate::cancel::CancellationToken;
use std::collections::VecDeque;

/// Unique identifier for a queued render request
pub type RequestId = u64;

/// Identifier of a preview slot in the current listing
pub type SlotId = usize;

/// Priority level for a render request
///
/// `Hover` outranks `Thumbnail`: a popup the user is waiting on should not
/// queue behind a strip of thumbnails scrolling into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequestPriority {
    /// Popup load for the item under the pointer
    Hover,

    /// Lazy thumbnail load for a slot that scrolled into view
    Thumbnail,
}

/// Which display site asked for the render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// The listing slot that scrolled into view
    Slot(SlotId),

    /// The hover popup
    Hover,
}

impl RequestOrigin {
    /// Priority implied by the origin
    pub fn priority(&self) -> RequestPriority {
        match self {
            RequestOrigin::Slot(_) => RequestPriority::Thumbnail,
            RequestOrigin::Hover => RequestPriority::Hover,
        }
    }
}

/// A queued render request
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Request identifier
    pub id: RequestId,

    /// Library item to render a first visual for
    pub item_id: u64,

    /// Display site that asked for the render
    pub origin: RequestOrigin,

    /// Cancellation token shared with the submitter
    pub token: CancellationToken,
}

/// Counters for queue activity
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueStats {
    /// Requests submitted over the queue lifetime
    pub submitted: u64,

    /// Requests handed out for execution
    pub executed: u64,

    /// Requests dropped because their token was cancelled
    pub cancelled: u64,
}

/// Two-priority FIFO queue of render requests
///
/// # Example
///
/// ```
/// use libshelf_scheduler::{RenderQueue, RequestOrigin};
///
/// let mut queue = RenderQueue::new();
/// let (_id, token) = queue.submit(7, RequestOrigin::Hover);
///
/// let request = queue.next_request().unwrap();
/// assert_eq!(request.item_id, 7);
/// assert!(!token.is_cancelled());
/// ```
pub struct RenderQueue {
    hover: VecDeque<RenderRequest>,
    thumbnail: VecDeque<RenderRequest>,
    next_id: RequestId,
    stats: QueueStats,
}

impl RenderQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            hover: VecDeque::new(),
            thumbnail: VecDeque::new(),
            next_id: 1,
            stats: QueueStats::default(),
        }
    }

    /// Submit a render request
    ///
    /// Returns the request id and a cancellation token. Cancelling the
    /// token before the request is popped drops it without execution.
    pub fn submit(&mut self, item_id: u64, origin: RequestOrigin) -> (RequestId, CancellationToken) {
        let id = self.next_id;
        self.next_id += 1;

        let token = CancellationToken::new();
        let request = RenderRequest {
            id,
            item_id,
            origin,
            token: token.clone(),
        };

        match origin.priority() {
            RequestPriority::Hover => self.hover.push_back(request),
            RequestPriority::Thumbnail => self.thumbnail.push_back(request),
        }
        self.stats.submitted += 1;

        (id, token)
    }

    /// Pop the next live request for execution
    ///
    /// Skips (and discards) requests whose token has been cancelled.
    /// Returns `None` once both priority levels are drained.
    pub fn next_request(&mut self) -> Option<RenderRequest> {
        loop {
            let request = match self.hover.pop_front() {
                Some(r) => r,
                None => self.thumbnail.pop_front()?,
            };
            if request.token.is_cancelled() {
                self.stats.cancelled += 1;
                continue;
            }
            self.stats.executed += 1;
            return Some(request);
        }
    }

    /// Cancel a queued request by id
    ///
    /// Returns `true` if the request was still queued. The request stays in
    /// its queue and is discarded when it reaches the front.
    pub fn cancel(&mut self, id: RequestId) -> bool {
        let found = self
            .hover
            .iter()
            .chain(self.thumbnail.iter())
            .find(|r| r.id == id);
        match found {
            Some(request) => {
                request.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Number of requests currently queued, including cancelled stragglers
    pub fn len(&self) -> usize {
        self.hover.len() + self.thumbnail.len()
    }

    /// Check whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.hover.is_empty() && self.thumbnail.is_empty()
    }

    /// Queue activity counters
    pub fn stats(&self) -> QueueStats {
        self.stats
    }

    /// Drop all queued requests
    pub fn clear(&mut self) {
        self.hover.clear();
        self.thumbnail.clear();
    }
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}
