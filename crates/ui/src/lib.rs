//! libshelf UI Library
//!
//! The listing-facing half of the preview subsystem: the slot views
//! thumbnails load into, the single floating hover popup with
//! viewport-aware placement, and the [`PreviewService`] that owns the
//! cache, the schedulers, and the popup on behalf of the listing.

pub mod placement;
pub mod popup;
pub mod service;
pub mod slot;

pub use placement::{place, DEFAULT_EDGE_MARGIN, POINTER_OFFSET};
pub use popup::{
    skeleton_label, visual_caption, PopupContent, PreviewPopup, LOAD_FAILED_TEXT, NO_PREVIEW_TEXT,
    POPUP_HEIGHT, POPUP_WIDTH,
};
pub use service::PreviewService;
pub use slot::{SlotContent, SlotView, NO_THUMBNAIL_TEXT, THUMBNAIL_FAILED_TEXT};
