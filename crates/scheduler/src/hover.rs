//! Debounced hover sessions for the preview popup
//!
//! Tracks the pointer over hoverable items and decides when a sustained
//! hover should open the floating preview popup. Entering an item arms a
//! debounce timer; leaving before it elapses cancels the session with no
//! visible effect, which keeps a pointer sweeping down the list from
//! flooding the renderers. One session exists at a time: entering item B
//! supersedes item A's session, mirroring the single popup instance.
//!
//! The controller is tick-driven: the host event loop calls `tick` with the
//! current instant and reacts to the returned fire.

use std::time::{Duration, Instant};

/// Delay between pointer-enter and the popup load firing
pub const HOVER_DEBOUNCE: Duration = Duration::from_millis(180);

/// Observable state of the hover session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    /// No session; pointer is not over an item
    Idle,

    /// Debounce running; cancellable with no visible effect
    Armed,

    /// Debounce fired; popup shows a skeleton while the load resolves
    Loading,

    /// Popup shows a result (visual or fallback text)
    Displayed,
}

/// Fired when a sustained hover crosses the debounce delay
///
/// Carries the item and the last known pointer position so the popup can
/// open in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverFire {
    pub item_id: u64,
    pub x: f32,
    pub y: f32,
}

struct Session {
    item_id: u64,
    state: HoverState,
    deadline: Instant,
    last_x: f32,
    last_y: f32,
}

/// Debounced single-session hover controller
///
/// # Example
///
/// ```
/// use libshelf_scheduler::{HoverController, HOVER_DEBOUNCE};
/// use std::time::Instant;
///
/// let mut hover = HoverController::new();
/// let start = Instant::now();
///
/// hover.pointer_enter(7, 100.0, 80.0, start);
/// assert!(hover.tick(start).is_none());
///
/// let fire = hover.tick(start + HOVER_DEBOUNCE).unwrap();
/// assert_eq!(fire.item_id, 7);
/// ```
pub struct HoverController {
    session: Option<Session>,
    debounce: Duration,
}

impl HoverController {
    /// Create a controller with the default debounce delay
    pub fn new() -> Self {
        Self {
            session: None,
            debounce: HOVER_DEBOUNCE,
        }
    }

    /// Set a custom debounce delay
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Pointer entered a hoverable item
    ///
    /// Cancels any existing session (pending timer included) and arms a
    /// fresh debounce for this item.
    pub fn pointer_enter(&mut self, item_id: u64, x: f32, y: f32, now: Instant) {
        self.session = Some(Session {
            item_id,
            state: HoverState::Armed,
            deadline: now + self.debounce,
            last_x: x,
            last_y: y,
        });
    }

    /// Pointer moved; records the latest coordinates
    ///
    /// Returns the coordinates when the popup is currently visible
    /// (`Loading` or `Displayed`) so the caller can reposition it
    /// immediately. Repositioning is never debounced.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let session = self.session.as_mut()?;
        session.last_x = x;
        session.last_y = y;
        match session.state {
            HoverState::Loading | HoverState::Displayed => Some((x, y)),
            _ => None,
        }
    }

    /// Pointer left the item; ends the session from any state
    ///
    /// Returns the state the session was in, so the caller can hide the
    /// popup (`Loading`/`Displayed`) or cancel an in-flight request
    /// (`Loading`). A leave during `Armed` is the silent-cancel path: the
    /// popup was never shown.
    pub fn pointer_leave(&mut self) -> Option<HoverState> {
        self.session.take().map(|s| s.state)
    }

    /// Advance the debounce; fires at most one load per armed period
    pub fn tick(&mut self, now: Instant) -> Option<HoverFire> {
        let session = self.session.as_mut()?;
        if session.state != HoverState::Armed || now < session.deadline {
            return None;
        }
        session.state = HoverState::Loading;
        Some(HoverFire {
            item_id: session.item_id,
            x: session.last_x,
            y: session.last_y,
        })
    }

    /// Mark the load for `item_id` as resolved and displayed
    ///
    /// Returns `false` when the session has since moved to another item or
    /// ended; the caller should discard the stale result's display (the
    /// cache write already happened and stays valid).
    pub fn displayed(&mut self, item_id: u64) -> bool {
        match self.session.as_mut() {
            Some(s) if s.item_id == item_id && s.state == HoverState::Loading => {
                s.state = HoverState::Displayed;
                true
            }
            _ => false,
        }
    }

    /// Current session state, `Idle` when no session exists
    pub fn state(&self) -> HoverState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(HoverState::Idle)
    }

    /// Item of the current session
    pub fn current_item(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.item_id)
    }

    /// Last known pointer position of the current session
    pub fn position(&self) -> Option<(f32, f32)> {
        self.session.as_ref().map(|s| (s.last_x, s.last_y))
    }
}

impl Default for HoverController {
    fn default() -> Self {
        Self::new()
    }
}
