//! Renderer adapter contract and registry
//!
//! The preview subsystem depends on its rendering backends only through
//! `render the first visual of this document`. Backends are registered
//! once at startup against a closed set of document kinds; call sites
//! resolve a kind from the item's extension and look the adapter up,
//! instead of comparing extension strings everywhere.

use crate::visual::RawVisual;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Closed set of document kinds the preview subsystem can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Paginated documents; the first visual is a rasterized first page
    Paginated,

    /// E-book archives; the first visual is the declared cover image
    Archive,
}

impl DocumentKind {
    /// Resolve a kind from a file extension (without dot, any case)
    ///
    /// Unknown extensions have no kind and therefore no preview.
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Paginated),
            "epub" => Some(DocumentKind::Archive),
            _ => None,
        }
    }
}

/// Errors a renderer adapter can produce
///
/// "Backend not installed" is not an error here: callers check
/// `is_ready()` through the readiness gate first and treat an unready
/// backend as "no preview". These errors are document-specific failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The backend was invoked while its library is not loaded
    #[error("renderer backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The document could not be opened
    #[error("failed to open document: {0}")]
    Open(String),

    /// The document opened but its first visual could not be produced
    #[error("failed to render first visual: {0}")]
    Render(String),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// A renderer backend for one document kind
///
/// `render_first_visual` returns `Ok(None)` when the document legitimately
/// has no first visual (for example an archive that declares no cover);
/// that is a normal outcome, not an error.
pub trait RendererAdapter: Send + Sync {
    /// The document kind this adapter renders
    fn kind(&self) -> DocumentKind;

    /// Whether the backend is loaded and able to render
    ///
    /// Backends that bind a native library lazily report `false` until the
    /// binding succeeds; the readiness gate polls this.
    fn is_ready(&self) -> bool;

    /// Produce the first visual of the document at `path`
    fn render_first_visual(&self, path: &Path) -> RenderResult<Option<RawVisual>>;
}

/// Kind-to-adapter table, resolved once at startup
///
/// # Example
///
/// ```no_run
/// use libshelf_render::{DocumentKind, RendererRegistry};
///
/// let registry = RendererRegistry::with_default_backends();
/// assert!(registry.adapter_for(DocumentKind::Paginated).is_some());
/// assert!(registry.adapter_for_ext("txt").is_none());
/// ```
pub struct RendererRegistry {
    adapters: HashMap<DocumentKind, Arc<dyn RendererAdapter>>,
}

impl RendererRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Create a registry with the built-in PDF and EPUB backends
    pub fn with_default_backends() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::pdf::PdfPageRenderer::new()));
        registry.register(Arc::new(crate::epub::EpubCoverRenderer::new()));
        registry
    }

    /// Register an adapter under its own kind
    ///
    /// Registering a second adapter for the same kind replaces the first.
    pub fn register(&mut self, adapter: Arc<dyn RendererAdapter>) {
        self.adapters.insert(adapter.kind(), adapter);
    }

    /// Look up the adapter for a kind
    pub fn adapter_for(&self, kind: DocumentKind) -> Option<Arc<dyn RendererAdapter>> {
        self.adapters.get(&kind).cloned()
    }

    /// Resolve an extension to its kind and adapter in one step
    pub fn adapter_for_ext(&self, ext: &str) -> Option<(DocumentKind, Arc<dyn RendererAdapter>)> {
        let kind = DocumentKind::from_ext(ext)?;
        let adapter = self.adapter_for(kind)?;
        Some((kind, adapter))
    }

    /// Number of registered adapters
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Check whether no adapters are registered
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::{EncodedImage, ImageFormat};

    struct StubAdapter {
        kind: DocumentKind,
        ready: bool,
    }

    impl RendererAdapter for StubAdapter {
        fn kind(&self) -> DocumentKind {
            self.kind
        }

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn render_first_visual(&self, _path: &Path) -> RenderResult<Option<RawVisual>> {
            Ok(Some(RawVisual::Image(EncodedImage::new(
                ImageFormat::Png,
                1,
                1,
                vec![0],
            ))))
        }
    }

    #[test]
    fn test_kind_from_ext() {
        assert_eq!(DocumentKind::from_ext("pdf"), Some(DocumentKind::Paginated));
        assert_eq!(DocumentKind::from_ext("PDF"), Some(DocumentKind::Paginated));
        assert_eq!(DocumentKind::from_ext("epub"), Some(DocumentKind::Archive));
        assert_eq!(DocumentKind::from_ext("txt"), None);
        assert_eq!(DocumentKind::from_ext(""), None);
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = RendererRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(StubAdapter {
            kind: DocumentKind::Paginated,
            ready: true,
        }));
        assert_eq!(registry.len(), 1);

        let adapter = registry.adapter_for(DocumentKind::Paginated).unwrap();
        assert!(adapter.is_ready());
        assert!(registry.adapter_for(DocumentKind::Archive).is_none());
    }

    #[test]
    fn test_registry_ext_resolution() {
        let mut registry = RendererRegistry::new();
        registry.register(Arc::new(StubAdapter {
            kind: DocumentKind::Archive,
            ready: false,
        }));

        let (kind, adapter) = registry.adapter_for_ext("epub").unwrap();
        assert_eq!(kind, DocumentKind::Archive);
        assert!(!adapter.is_ready());

        // Known kind, no adapter registered.
        assert!(registry.adapter_for_ext("pdf").is_none());
        // Unknown extension.
        assert!(registry.adapter_for_ext("mobi").is_none());
    }

    #[test]
    fn test_register_replaces_same_kind() {
        let mut registry = RendererRegistry::new();
        registry.register(Arc::new(StubAdapter {
            kind: DocumentKind::Paginated,
            ready: false,
        }));
        registry.register(Arc::new(StubAdapter {
            kind: DocumentKind::Paginated,
            ready: true,
        }));

        assert_eq!(registry.len(), 1);
        assert!(registry
            .adapter_for(DocumentKind::Paginated)
            .unwrap()
            .is_ready());
    }
}
