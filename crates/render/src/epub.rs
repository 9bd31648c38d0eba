//! Cover extractor for e-book archives
//!
//! Pulls the declared cover image out of an EPUB archive. Covers arrive
//! already encoded, so the adapter emits a [`RawVisual::Image`] and the
//! cache stores it as-is. The archive handle is released before the bytes
//! are inspected: many items get rendered over a session, and holding zip
//! handles open would accumulate descriptors.

use crate::adapter::{DocumentKind, RenderError, RendererAdapter, RenderResult};
use crate::visual::{EncodedImage, ImageFormat, RawVisual};
use ::epub::doc::EpubDoc;
use std::io::Cursor;
use std::path::Path;

/// EPUB cover renderer
///
/// A pure-Rust backend: it is compiled in and therefore always ready; the
/// readiness gate resolves immediately for archive items.
pub struct EpubCoverRenderer;

impl EpubCoverRenderer {
    /// Create a cover renderer
    pub fn new() -> Self {
        Self
    }

    /// Determine format and dimensions of encoded cover bytes
    fn probe(bytes: &[u8], declared_mime: &str) -> RenderResult<(ImageFormat, u32, u32)> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| RenderError::Render(format!("cover probe failed: {}", e)))?;

        let format = match reader.format() {
            Some(image::ImageFormat::Png) => ImageFormat::Png,
            Some(image::ImageFormat::Jpeg) => ImageFormat::Jpeg,
            // Fall back to the manifest's MIME type when the bytes are
            // ambiguous.
            _ => ImageFormat::from_mime(declared_mime).ok_or_else(|| {
                RenderError::Render(format!("unsupported cover format: {}", declared_mime))
            })?,
        };

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| RenderError::Render(format!("cover decode failed: {}", e)))?;

        Ok((format, width, height))
    }
}

impl Default for EpubCoverRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererAdapter for EpubCoverRenderer {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Archive
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn render_first_visual(&self, path: &Path) -> RenderResult<Option<RawVisual>> {
        let mut doc = EpubDoc::new(path).map_err(|e| RenderError::Open(e.to_string()))?;
        let cover = doc.get_cover();
        // Release the archive handle before doing anything with the bytes.
        drop(doc);

        let Some((bytes, mime)) = cover else {
            log::debug!("{} declares no cover", path.display());
            return Ok(None);
        };

        let (format, width, height) = Self::probe(&bytes, &mime)?;
        Ok(Some(RawVisual::Image(EncodedImage::new(
            format, width, height, bytes,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 opaque PNG
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0xF8,
        0xCF, 0xC0, 0x00, 0x00, 0x00, 0x03, 0x00, 0x01, 0x9A, 0x60, 0xE1, 0xD5, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_renderer_kind_and_readiness() {
        let renderer = EpubCoverRenderer::new();
        assert_eq!(renderer.kind(), DocumentKind::Archive);
        assert!(renderer.is_ready());
    }

    #[test]
    fn test_probe_png_bytes() {
        let (format, width, height) = EpubCoverRenderer::probe(TINY_PNG, "image/png").unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!((width, height), (1, 1));
    }

    #[test]
    fn test_probe_rejects_garbage() {
        let err = EpubCoverRenderer::probe(&[0, 1, 2, 3], "application/octet-stream").unwrap_err();
        assert!(matches!(err, RenderError::Render(_)));
    }

    #[test]
    fn test_missing_archive_is_open_error() {
        let renderer = EpubCoverRenderer::new();
        let err = renderer
            .render_first_visual(Path::new("does-not-exist.epub"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Open(_)));
    }
}
