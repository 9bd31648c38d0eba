//! libshelf Render Library
//!
//! First-visual rendering for library items: a PDFium-backed first-page
//! rasterizer for paginated documents and a cover extractor for e-book
//! archives, both behind the narrow [`RendererAdapter`] contract the
//! preview subsystem depends on. Adapters are resolved through a
//! [`RendererRegistry`] keyed by [`DocumentKind`], populated once at
//! startup.

pub mod adapter;
pub mod epub;
pub mod pdf;
pub mod visual;

// Re-export public API
pub use adapter::{DocumentKind, RenderError, RenderResult, RendererAdapter, RendererRegistry};
pub use epub::EpubCoverRenderer;
pub use pdf::PdfPageRenderer;
pub use visual::{EncodedImage, ImageFormat, PixelSurface, RawVisual, VisualNode};
