//! Floating preview popup
//!
//! One popup instance exists process-wide; the hover session that last
//! wrote to it owns its content. The popup opens in a skeleton state with
//! backend-specific wording as soon as the hover debounce fires, then
//! swaps to the rendered visual plus a caption, or to a textual fallback.
//! Every show and reposition goes through viewport-aware placement.

use crate::placement::{place, DEFAULT_EDGE_MARGIN};
use libshelf_core::ItemId;
use libshelf_render::{DocumentKind, VisualNode};

/// Popup width used for placement
pub const POPUP_WIDTH: f32 = 260.0;

/// Popup height used for placement
pub const POPUP_HEIGHT: f32 = 340.0;

/// Fallback when the renderer produced nothing
pub const NO_PREVIEW_TEXT: &str = "No preview available";

/// Fallback when the renderer failed
pub const LOAD_FAILED_TEXT: &str = "Failed to load preview";

/// Skeleton wording while a load resolves, by backend
pub fn skeleton_label(kind: Option<DocumentKind>) -> &'static str {
    match kind {
        Some(DocumentKind::Paginated) => "Rendering first page…",
        Some(DocumentKind::Archive) => "Fetching cover…",
        None => "Preview unavailable",
    }
}

/// Caption under a rendered visual, by backend
pub fn visual_caption(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Paginated => "First page",
        DocumentKind::Archive => "Cover",
    }
}

/// What the popup currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum PopupContent {
    /// Loading placeholder with backend-specific wording
    Skeleton { label: &'static str },

    /// Rendered visual with its caption
    Visual {
        node: VisualNode,
        caption: &'static str,
    },

    /// Textual fallback (no preview / failure); dismissible, not an error
    Message { text: &'static str },
}

/// The single floating preview popup
pub struct PreviewPopup {
    visible: bool,
    position: (f32, f32),
    content: Option<PopupContent>,

    /// Item owning the current content
    item_id: Option<ItemId>,

    viewport_width: f32,
    viewport_height: f32,
    edge_margin: f32,
}

impl PreviewPopup {
    /// Create a hidden popup for a viewport
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            visible: false,
            position: (0.0, 0.0),
            content: None,
            item_id: None,
            viewport_width,
            viewport_height,
            edge_margin: DEFAULT_EDGE_MARGIN,
        }
    }

    /// Update viewport dimensions used for placement
    pub fn set_viewport_dimensions(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Show the loading skeleton for an item at the pointer
    pub fn show_skeleton(&mut self, item_id: ItemId, kind: Option<DocumentKind>, x: f32, y: f32) {
        self.item_id = Some(item_id);
        self.content = Some(PopupContent::Skeleton {
            label: skeleton_label(kind),
        });
        self.visible = true;
        self.reposition(x, y);
    }

    /// Replace the content with a rendered visual
    pub fn show_visual(&mut self, item_id: ItemId, node: VisualNode, kind: DocumentKind, x: f32, y: f32) {
        self.item_id = Some(item_id);
        self.content = Some(PopupContent::Visual {
            node,
            caption: visual_caption(kind),
        });
        self.visible = true;
        self.reposition(x, y);
    }

    /// Replace the content with fallback text
    pub fn show_message(&mut self, item_id: ItemId, text: &'static str, x: f32, y: f32) {
        self.item_id = Some(item_id);
        self.content = Some(PopupContent::Message { text });
        self.visible = true;
        self.reposition(x, y);
    }

    /// Recompute placement for a new pointer position
    pub fn reposition(&mut self, pointer_x: f32, pointer_y: f32) {
        self.position = place(
            pointer_x,
            pointer_y,
            POPUP_WIDTH,
            POPUP_HEIGHT,
            self.viewport_width,
            self.viewport_height,
            self.edge_margin,
        );
    }

    /// Hide the popup and drop its content
    pub fn hide(&mut self) {
        self.visible = false;
        self.content = None;
        self.item_id = None;
    }

    /// Whether the popup is on screen
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current top-left position
    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Current content
    pub fn content(&self) -> Option<&PopupContent> {
        self.content.as_ref()
    }

    /// Item owning the current content
    pub fn item_id(&self) -> Option<ItemId> {
        self.item_id
    }
}
