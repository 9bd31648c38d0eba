//! Visibility-driven lazy loading of preview slots
//!
//! Tracks one placeholder slot per listed item and reports which slots have
//! scrolled into view so their preview can be loaded. Each slot fires at
//! most once: when its visible fraction against a margin-expanded viewport
//! crosses the threshold it transitions to `Loading` and observation stops,
//! even if the slot later leaves and re-enters the viewport.

use crate::queue::SlotId;

/// Extra viewport height, in pixels, added above and below the visible
/// area so slots start loading shortly before they scroll on screen
pub const DEFAULT_SCROLL_MARGIN: f32 = 300.0;

/// Fraction of a slot that must be inside the expanded viewport before its
/// load fires
pub const DEFAULT_VISIBLE_FRACTION: f32 = 0.1;

/// Axis-aligned rectangle in listing coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SlotRect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle area
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Area of the overlap with another rectangle, zero when disjoint
    pub fn intersection_area(&self, other: &SlotRect) -> f32 {
        let left = self.x.max(other.x);
        let right = (self.x + self.width).min(other.x + other.width);
        let top = self.y.max(other.y);
        let bottom = (self.y + self.height).min(other.y + other.height);

        let w = (right - left).max(0.0);
        let h = (bottom - top).max(0.0);
        w * h
    }
}

/// Lifecycle of one preview slot
///
/// `Filled`, `Empty`, and `Failed` are terminal; a slot is never retried
/// within one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Registered, waiting to scroll into view
    Observed,

    /// Visibility fired; a render request is pending or in flight
    Loading,

    /// Preview rendered and attached
    Filled,

    /// Renderer ran but produced nothing (or no renderer exists)
    Empty,

    /// Renderer failed
    Failed,
}

impl SlotState {
    /// Whether the slot has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, SlotState::Filled | SlotState::Empty | SlotState::Failed)
    }
}

/// Terminal outcome of a slot or popup load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A visual was produced
    Filled,

    /// No visual exists for this item
    Empty,

    /// The renderer rejected the document
    Failed,
}

struct Slot {
    rect: SlotRect,
    state: SlotState,
}

/// One-shot visibility tracker for the current listing's slots
///
/// # Example
///
/// ```
/// use libshelf_scheduler::{SlotRect, SlotState, VisibilityTracker};
///
/// let mut tracker = VisibilityTracker::new();
/// let slot = tracker.register(SlotRect::new(0.0, 0.0, 200.0, 150.0));
///
/// let viewport = SlotRect::new(0.0, 0.0, 800.0, 600.0);
/// assert_eq!(tracker.due_slots(&viewport), vec![slot]);
/// assert_eq!(tracker.state(slot), Some(SlotState::Loading));
///
/// // Scrolling the slot out and back never re-fires it.
/// assert!(tracker.due_slots(&viewport).is_empty());
/// ```
pub struct VisibilityTracker {
    slots: Vec<Slot>,
    scroll_margin: f32,
    visible_fraction: f32,
}

impl VisibilityTracker {
    /// Create a tracker with default margin and threshold
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            scroll_margin: DEFAULT_SCROLL_MARGIN,
            visible_fraction: DEFAULT_VISIBLE_FRACTION,
        }
    }

    /// Set the vertical margin added around the viewport
    pub fn with_scroll_margin(mut self, margin: f32) -> Self {
        self.scroll_margin = margin;
        self
    }

    /// Set the visible-fraction threshold
    pub fn with_visible_fraction(mut self, fraction: f32) -> Self {
        self.visible_fraction = fraction;
        self
    }

    /// Register a slot and start observing it
    pub fn register(&mut self, rect: SlotRect) -> SlotId {
        let id = self.slots.len();
        self.slots.push(Slot {
            rect,
            state: SlotState::Observed,
        });
        id
    }

    /// Drop every slot; called when the listing is replaced
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Slots whose load should fire for the given viewport
    ///
    /// The viewport is expanded by the scroll margin above and below
    /// (lazy loading leads the scroll direction). Every returned slot has
    /// transitioned `Observed -> Loading` and will never be returned again.
    pub fn due_slots(&mut self, viewport: &SlotRect) -> Vec<SlotId> {
        let expanded = SlotRect::new(
            viewport.x,
            viewport.y - self.scroll_margin,
            viewport.width,
            viewport.height + 2.0 * self.scroll_margin,
        );

        let mut due = Vec::new();
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if slot.state != SlotState::Observed {
                continue;
            }
            let area = slot.rect.area();
            if area <= 0.0 {
                // zero-size slots can never meet the fraction threshold
                continue;
            }
            let visible = slot.rect.intersection_area(&expanded) / area;
            if visible >= self.visible_fraction {
                slot.state = SlotState::Loading;
                due.push(id);
            }
        }
        due
    }

    /// Record the terminal outcome of a slot load
    ///
    /// Only a slot in `Loading` accepts an outcome; returns `false`
    /// otherwise (unknown id or already terminal).
    pub fn complete(&mut self, id: SlotId, outcome: LoadOutcome) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            return false;
        };
        if slot.state != SlotState::Loading {
            return false;
        }
        slot.state = match outcome {
            LoadOutcome::Filled => SlotState::Filled,
            LoadOutcome::Empty => SlotState::Empty,
            LoadOutcome::Failed => SlotState::Failed,
        };
        true
    }

    /// Current state of a slot
    pub fn state(&self, id: SlotId) -> Option<SlotState> {
        self.slots.get(id).map(|s| s.state)
    }

    /// Number of registered slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check whether any slots are registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new()
    }
}
