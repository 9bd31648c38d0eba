//! First-page rasterizer for paginated documents
//!
//! PDFium-backed adapter that renders page one of a document into a pixel
//! surface. The native library is bound lazily on first use; until the
//! binding succeeds the adapter reports itself unready and the readiness
//! gate keeps callers from treating that as a failure.

use crate::adapter::{DocumentKind, RenderError, RendererAdapter, RenderResult};
use crate::visual::{PixelSurface, RawVisual};
use pdfium_render::prelude::*;
use std::path::Path;
use std::sync::OnceLock;

/// Default bounding box the first page is scaled to fit
const DEFAULT_TARGET_WIDTH: u32 = 320;
const DEFAULT_TARGET_HEIGHT: u32 = 480;

/// Minimum scale applied when a page is enormous
const MIN_SCALE: f32 = 0.05;

/// PDFium-backed first-page renderer
///
/// Produces a [`RawVisual::Surface`]: the rasterized page is a mutable
/// drawing surface until the cache normalizes it.
pub struct PdfPageRenderer {
    target_width: u32,
    target_height: u32,

    /// Lazily-bound PDFium instance; `None` inside means binding failed
    binding: OnceLock<Option<Pdfium>>,
}

impl PdfPageRenderer {
    /// Create a renderer with the default target size
    pub fn new() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            target_height: DEFAULT_TARGET_HEIGHT,
            binding: OnceLock::new(),
        }
    }

    /// Create a renderer scaling pages to fit a custom bounding box
    pub fn with_target_size(width: u32, height: u32) -> Self {
        Self {
            target_width: width,
            target_height: height,
            binding: OnceLock::new(),
        }
    }

    /// Bind the PDFium library
    ///
    /// Search order:
    /// 1. Executable's directory (for app bundles)
    /// 2. Current working directory
    /// 3. System library paths
    fn bind() -> Option<Pdfium> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        if let Some(ref dir) = exe_dir {
            if let Ok(bindings) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            {
                return Some(Pdfium::new(bindings));
            }
        }

        match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
        {
            Ok(bindings) => Some(Pdfium::new(bindings)),
            Err(e) => {
                log::warn!("PDFium binding failed, page previews disabled: {}", e);
                None
            }
        }
    }

    fn pdfium(&self) -> Option<&Pdfium> {
        self.binding.get_or_init(Self::bind).as_ref()
    }
}

impl Default for PdfPageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererAdapter for PdfPageRenderer {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Paginated
    }

    fn is_ready(&self) -> bool {
        self.pdfium().is_some()
    }

    fn render_first_visual(&self, path: &Path) -> RenderResult<Option<RawVisual>> {
        let pdfium = self.pdfium().ok_or_else(|| {
            RenderError::BackendUnavailable("PDFium library is not loaded".to_string())
        })?;

        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| RenderError::Open(e.to_string()))?;

        let pages = document.pages();
        if pages.len() == 0 {
            // a paginated document with no pages has nothing to preview
            return Ok(None);
        }

        let page = pages
            .get(0)
            .map_err(|e| RenderError::Render(e.to_string()))?;

        // Scale to fit the target box, preserving aspect ratio.
        let page_width = page.width().value;
        let page_height = page.height().value;
        let scale = (self.target_width as f32 / page_width)
            .min(self.target_height as f32 / page_height)
            .max(MIN_SCALE);
        let width = (page_width * scale).round().max(1.0) as u32;
        let height = (page_height * scale).round().max(1.0) as u32;

        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32)
            .render_form_data(false);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| RenderError::Render(e.to_string()))?;

        let surface = PixelSurface::from_rgba(width, height, bitmap.as_rgba_bytes().to_vec());
        log::debug!(
            "rasterized first page of {} at {}x{}",
            path.display(),
            width,
            height
        );

        Ok(Some(RawVisual::Surface(surface)))
    }
}
