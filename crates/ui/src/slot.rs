//! Preview slot view
//!
//! The placeholder cell a listed item's thumbnail loads into. The view
//! carries only display content; the load lifecycle lives in the
//! scheduler's visibility tracker. Slot views are discarded wholesale when
//! the listing is re-rendered.

use libshelf_render::VisualNode;

/// Indicator shown when a renderer produced nothing for the item
pub const NO_THUMBNAIL_TEXT: &str = "No thumbnail";

/// Indicator shown when the renderer failed
pub const THUMBNAIL_FAILED_TEXT: &str = "Preview failed";

/// Display content of one slot
#[derive(Debug, Clone, PartialEq)]
pub enum SlotContent {
    /// Nothing loaded yet
    Pending,

    /// Rendered preview attached
    Visual(VisualNode),

    /// Terminal: no preview exists for this item
    NoPreview,

    /// Terminal: rendering failed
    Failed,
}

/// One item's preview placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    content: SlotContent,
}

impl SlotView {
    /// Create an empty placeholder
    pub fn new() -> Self {
        Self {
            content: SlotContent::Pending,
        }
    }

    /// Attach a rendered visual
    pub fn set_visual(&mut self, node: VisualNode) {
        self.content = SlotContent::Visual(node);
    }

    /// Show the neutral no-preview indicator
    pub fn set_no_preview(&mut self) {
        self.content = SlotContent::NoPreview;
    }

    /// Show the failure indicator
    pub fn set_failed(&mut self) {
        self.content = SlotContent::Failed;
    }

    /// Current content
    pub fn content(&self) -> &SlotContent {
        &self.content
    }

    /// Indicator text for the textual states
    pub fn indicator_text(&self) -> Option<&'static str> {
        match self.content {
            SlotContent::NoPreview => Some(NO_THUMBNAIL_TEXT),
            SlotContent::Failed => Some(THUMBNAIL_FAILED_TEXT),
            _ => None,
        }
    }

    /// The attached visual, if any
    pub fn visual(&self) -> Option<&VisualNode> {
        match &self.content {
            SlotContent::Visual(node) => Some(node),
            _ => None,
        }
    }
}

impl Default for SlotView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libshelf_render::{EncodedImage, ImageFormat};

    fn node() -> VisualNode {
        VisualNode::new(EncodedImage::new(ImageFormat::Png, 2, 2, vec![0; 4]))
    }

    #[test]
    fn test_starts_pending() {
        let view = SlotView::new();
        assert_eq!(*view.content(), SlotContent::Pending);
        assert!(view.indicator_text().is_none());
        assert!(view.visual().is_none());
    }

    #[test]
    fn test_visual_attachment() {
        let mut view = SlotView::new();
        view.set_visual(node());
        assert!(view.visual().is_some());
        assert!(view.indicator_text().is_none());
    }

    #[test]
    fn test_textual_indicators() {
        let mut view = SlotView::new();
        view.set_no_preview();
        assert_eq!(view.indicator_text(), Some(NO_THUMBNAIL_TEXT));

        view.set_failed();
        assert_eq!(view.indicator_text(), Some(THUMBNAIL_FAILED_TEXT));
    }

    #[test]
    fn test_detaching_one_view_leaves_other_clones() {
        let shared = node();
        let mut a = SlotView::new();
        let mut b = SlotView::new();
        a.set_visual(shared.clone());
        b.set_visual(shared);

        // Replacing a's content must not disturb b's clone.
        a.set_no_preview();
        assert!(b.visual().is_some());
    }
}
