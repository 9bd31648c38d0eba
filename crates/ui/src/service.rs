//! Preview service: the owner of the whole preview subsystem
//!
//! An explicitly constructed object wiring the two trigger paths to the
//! shared cache and the renderer registry. The listing hands it the
//! current item set, the host event loop feeds it pointer and scroll
//! events plus a `tick`, and the service drives everything else:
//!
//! - visibility: slots entering the (margin-expanded) viewport get a
//!   one-shot thumbnail load
//! - hover: a sustained hover opens the popup in a skeleton state and
//!   loads the same visual
//!
//! Both paths consult the cache first, then the readiness gate, then the
//! adapter resolved from the item's document kind. Execution is
//! cooperative: `tick` runs at most one render, so a renderer can never
//! monopolize the loop.

use crate::popup::{PreviewPopup, LOAD_FAILED_TEXT, NO_PREVIEW_TEXT};
use crate::slot::SlotView;
use libshelf_cache::{CacheStats, PreviewCache};
use libshelf_core::{ItemId, LibraryItem};
use libshelf_render::{DocumentKind, RenderError, RendererRegistry, VisualNode};
use libshelf_scheduler::{
    CancellationToken, GateStatus, HoverController, HoverState, LoadOutcome, ReadinessGate,
    RenderQueue, RenderRequest, RequestOrigin, SlotId, SlotRect, SlotState, VisibilityTracker,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// A load waiting on its backend's readiness gate
struct PendingLoad {
    origin: RequestOrigin,
    item_id: ItemId,
    kind: DocumentKind,
    gate: ReadinessGate,
}

/// Resolved result of a load, ready to hand to a display site
enum Delivery {
    Filled { node: VisualNode, kind: DocumentKind },
    Empty,
    Failed,
}

/// Orchestrator owning the cache, popup, and both schedulers
///
/// Created once per listing surface and torn down on page navigation;
/// there is no module-level state.
pub struct PreviewService {
    registry: Arc<RendererRegistry>,
    cache: PreviewCache,
    tracker: VisibilityTracker,
    hover: HoverController,
    queue: RenderQueue,
    popup: PreviewPopup,

    /// Items of the current listing, by id
    items: HashMap<ItemId, LibraryItem>,

    /// Slot id -> item id (slot ids are registration order)
    slot_items: Vec<ItemId>,

    /// Slot id -> display view
    slot_views: Vec<SlotView>,

    /// Loads waiting on a readiness gate
    pending: Vec<PendingLoad>,

    /// Token of the in-flight hover request, for cancel-on-leave
    hover_request: Option<CancellationToken>,
}

impl PreviewService {
    /// Create a service for a viewport of the given size
    pub fn new(registry: Arc<RendererRegistry>, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            registry,
            cache: PreviewCache::new(),
            tracker: VisibilityTracker::new(),
            hover: HoverController::new(),
            queue: RenderQueue::new(),
            popup: PreviewPopup::new(viewport_width, viewport_height),
            items: HashMap::new(),
            slot_items: Vec::new(),
            slot_views: Vec::new(),
            pending: Vec::new(),
            hover_request: None,
        }
    }

    /// Replace custom schedulers (margins, debounce) before first use
    pub fn with_tracker(mut self, tracker: VisibilityTracker) -> Self {
        self.tracker = tracker;
        self
    }

    /// Replace the hover controller (custom debounce) before first use
    pub fn with_hover(mut self, hover: HoverController) -> Self {
        self.hover = hover;
        self
    }

    /// Replace the listing with a new item set
    ///
    /// Old slots are discarded, never reused; in-flight work for the old
    /// listing is dropped. The cache survives listings: re-listing the
    /// same items re-fills their slots without re-rendering.
    pub fn begin_listing(&mut self, items: Vec<(LibraryItem, SlotRect)>) {
        self.queue.clear();
        self.pending.clear();
        self.tracker.clear();
        self.slot_items.clear();
        self.slot_views.clear();
        self.items.clear();
        self.hover.pointer_leave();
        self.hover_request = None;
        self.popup.hide();

        for (item, rect) in items {
            let slot = self.tracker.register(rect);
            debug_assert_eq!(slot, self.slot_items.len());
            self.slot_items.push(item.id);
            self.slot_views.push(SlotView::new());
            self.items.insert(item.id, item);
        }
    }

    /// Scroll/viewport update; fires due visibility loads
    pub fn set_viewport(&mut self, viewport: &SlotRect, now: Instant) {
        for slot in self.tracker.due_slots(viewport) {
            let item_id = self.slot_items[slot];
            self.start_load(RequestOrigin::Slot(slot), item_id, now);
        }
    }

    /// Pointer entered a listed item
    pub fn pointer_enter(&mut self, item_id: ItemId, x: f32, y: f32, now: Instant) {
        // A new hover supersedes whatever the previous session had queued.
        self.cancel_hover_work();
        self.hover.pointer_enter(item_id, x, y, now);
    }

    /// Pointer moved within the hovered item
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some((x, y)) = self.hover.pointer_move(x, y) {
            if self.popup.is_visible() {
                self.popup.reposition(x, y);
            }
        }
    }

    /// Pointer left the hovered item
    pub fn pointer_leave(&mut self) {
        let was = self.hover.pointer_leave();
        self.cancel_hover_work();
        if matches!(was, Some(HoverState::Loading | HoverState::Displayed)) {
            self.popup.hide();
        }
    }

    /// Advance the subsystem by one cooperative step
    ///
    /// Runs at most one renderer invocation, then the hover debounce, then
    /// the readiness gates. A request submitted this tick executes on the
    /// next one, which keeps the skeleton state observable and leaves a
    /// window for cancel-on-leave.
    pub fn tick(&mut self, now: Instant) {
        self.execute_next();

        if let Some(fire) = self.hover.tick(now) {
            let kind = self.items.get(&fire.item_id).and_then(|i| i.kind());
            self.popup.show_skeleton(fire.item_id, kind, fire.x, fire.y);
            self.start_load(RequestOrigin::Hover, fire.item_id, now);
        }

        self.poll_gates(now);
    }

    /// Tear the service down on page navigation
    pub fn teardown(&mut self) {
        self.queue.clear();
        self.pending.clear();
        self.tracker.clear();
        self.slot_items.clear();
        self.slot_views.clear();
        self.items.clear();
        self.hover.pointer_leave();
        self.hover_request = None;
        self.popup.hide();
        self.cache.clear();
    }

    /// The single popup instance
    pub fn popup(&self) -> &PreviewPopup {
        &self.popup
    }

    /// A slot's display view
    pub fn slot_view(&self, slot: SlotId) -> Option<&SlotView> {
        self.slot_views.get(slot)
    }

    /// A slot's lifecycle state
    pub fn slot_state(&self, slot: SlotId) -> Option<SlotState> {
        self.tracker.state(slot)
    }

    /// Current hover session state
    pub fn hover_state(&self) -> HoverState {
        self.hover.state()
    }

    /// Preview cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Whether the cache holds a master entry for an item
    pub fn is_cached(&self, item_id: ItemId) -> bool {
        self.cache.contains(item_id)
    }

    /// Number of slots in the current listing
    pub fn listing_len(&self) -> usize {
        self.slot_items.len()
    }

    /// Start the cache-or-render path for one display site
    fn start_load(&mut self, origin: RequestOrigin, item_id: ItemId, now: Instant) {
        let kind = self.items.get(&item_id).and_then(|i| i.kind());

        // The shared cache short-circuits both trigger paths.
        if let Some(node) = self.cache.clone_entry(item_id) {
            match kind {
                Some(kind) => self.deliver(origin, item_id, Delivery::Filled { node, kind }),
                None => self.deliver(origin, item_id, Delivery::Empty),
            }
            return;
        }

        let Some(kind) = kind else {
            // Unsupported extension: no readiness wait, no renderer call.
            match origin {
                RequestOrigin::Slot(_) => self.deliver(origin, item_id, Delivery::Empty),
                RequestOrigin::Hover => {
                    // The skeleton already reads "Preview unavailable";
                    // that text is the terminal popup content.
                    self.hover.displayed(item_id);
                }
            }
            return;
        };

        if self.registry.adapter_for(kind).is_none() {
            self.deliver(origin, item_id, Delivery::Empty);
            return;
        }

        self.pending.push(PendingLoad {
            origin,
            item_id,
            kind,
            gate: ReadinessGate::new(now),
        });
    }

    /// Poll readiness gates; submit ready loads, expire timed-out ones
    fn poll_gates(&mut self, now: Instant) {
        let mut still_pending = Vec::new();
        for mut load in std::mem::take(&mut self.pending) {
            let Some(adapter) = self.registry.adapter_for(load.kind) else {
                self.deliver(load.origin, load.item_id, Delivery::Empty);
                continue;
            };
            match load.gate.poll(now, || adapter.is_ready()) {
                GateStatus::Ready => {
                    let (_, token) = self.queue.submit(load.item_id, load.origin);
                    if load.origin == RequestOrigin::Hover {
                        self.hover_request = Some(token);
                    }
                }
                GateStatus::TimedOut => {
                    // An absent backend is "no preview", never an error.
                    log::warn!(
                        "renderer for {:?} not ready in time, item {} gets no preview",
                        load.kind,
                        load.item_id
                    );
                    self.deliver(load.origin, load.item_id, Delivery::Empty);
                }
                GateStatus::Pending => still_pending.push(load),
            }
        }
        self.pending = still_pending;
    }

    /// Execute at most one queued render request
    fn execute_next(&mut self) {
        let Some(request) = self.queue.next_request() else {
            return;
        };
        let RenderRequest {
            item_id, origin, ..
        } = request;

        let (path, kind) = match self.items.get(&item_id) {
            Some(item) => match item.kind() {
                Some(kind) => (item.path.clone(), kind),
                None => {
                    self.deliver(origin, item_id, Delivery::Empty);
                    return;
                }
            },
            // Listing was replaced while the request sat in the queue.
            None => return,
        };
        let Some(adapter) = self.registry.adapter_for(kind) else {
            self.deliver(origin, item_id, Delivery::Empty);
            return;
        };

        match adapter.render_first_visual(&path) {
            Ok(Some(raw)) => {
                self.cache.insert(item_id, raw);
                match self.cache.clone_entry(item_id) {
                    Some(node) => self.deliver(origin, item_id, Delivery::Filled { node, kind }),
                    None => self.deliver(origin, item_id, Delivery::Empty),
                }
            }
            Ok(None) => self.deliver(origin, item_id, Delivery::Empty),
            Err(RenderError::BackendUnavailable(msg)) => {
                log::warn!("backend vanished for item {}: {}", item_id, msg);
                self.deliver(origin, item_id, Delivery::Empty);
            }
            Err(e) => {
                log::warn!("render failed for item {}: {}", item_id, e);
                self.deliver(origin, item_id, Delivery::Failed);
            }
        }
    }

    /// Apply a resolved load to its display site
    fn deliver(&mut self, origin: RequestOrigin, item_id: ItemId, delivery: Delivery) {
        match origin {
            RequestOrigin::Slot(slot) => {
                let outcome = match delivery {
                    Delivery::Filled { .. } => LoadOutcome::Filled,
                    Delivery::Empty => LoadOutcome::Empty,
                    Delivery::Failed => LoadOutcome::Failed,
                };
                if self.tracker.complete(slot, outcome) {
                    if let Some(view) = self.slot_views.get_mut(slot) {
                        match delivery {
                            Delivery::Filled { node, .. } => view.set_visual(node),
                            Delivery::Empty => view.set_no_preview(),
                            Delivery::Failed => view.set_failed(),
                        }
                    }
                }
            }
            RequestOrigin::Hover => {
                self.hover_request = None;
                if !self.hover.displayed(item_id) {
                    // The session moved on; the cache write (if any) stays,
                    // the display is discarded.
                    log::debug!("discarding stale hover result for item {}", item_id);
                    return;
                }
                let (x, y) = self.hover.position().unwrap_or(self.popup.position());
                match delivery {
                    Delivery::Filled { node, kind } => {
                        self.popup.show_visual(item_id, node, kind, x, y)
                    }
                    Delivery::Empty => self.popup.show_message(item_id, NO_PREVIEW_TEXT, x, y),
                    Delivery::Failed => self.popup.show_message(item_id, LOAD_FAILED_TEXT, x, y),
                }
            }
        }
    }

    /// Cancel the hover path's queued/gated work
    fn cancel_hover_work(&mut self) {
        if let Some(token) = self.hover_request.take() {
            token.cancel();
        }
        self.pending.retain(|l| l.origin != RequestOrigin::Hover);
    }
}
