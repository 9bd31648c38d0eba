//! Preview cache with reusability normalization
//!
//! One process-lifetime mapping from item id to the normalized master
//! visual, shared by the visibility and hover trigger paths. Raw visuals
//! are normalized on insert: a drawing surface cannot be attached to two
//! display sites at once (thumbnail cell and hover popup show the same
//! document), so surfaces are converted to immutable PNG bytes before they
//! are stored. Consumers never receive the master; `clone_entry` hands out
//! an independent duplicate per display site.
//!
//! There is no eviction. The working set is the current result page, and
//! the service clears the cache wholesale on teardown.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use libshelf_render::{EncodedImage, ImageFormat, PixelSurface, RawVisual, VisualNode};
use std::collections::HashMap;

/// Item identifier, matching the listing's item ids
pub type ItemId = u64;

/// Counters for cache usage
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of master entries
    pub entry_count: usize,

    /// Encoded bytes held by all master entries
    pub resident_bytes: usize,

    /// Number of lookup hits
    pub hits: u64,

    /// Number of lookup misses
    pub misses: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Convert a raw visual into its normalized, shareable form
///
/// Surfaces are PNG-encoded into an [`EncodedImage`]; already-encoded
/// images pass through unchanged.
pub fn normalize(raw: RawVisual) -> VisualNode {
    match raw {
        RawVisual::Image(image) => VisualNode::new(image),
        RawVisual::Surface(surface) => VisualNode::new(encode_surface(&surface)),
    }
}

fn encode_surface(surface: &PixelSurface) -> EncodedImage {
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(&mut bytes);
    if let Err(e) = encoder.write_image(
        surface.pixels(),
        surface.width(),
        surface.height(),
        ExtendedColorType::Rgba8,
    ) {
        // Encoding an in-memory RGBA buffer only fails on dimension
        // mismatch; fall back to an empty image rather than poisoning the
        // cache path.
        log::warn!("surface normalization failed: {}", e);
        return EncodedImage::new(ImageFormat::Png, 0, 0, Vec::new());
    }
    EncodedImage::new(ImageFormat::Png, surface.width(), surface.height(), bytes)
}

/// Process-lifetime preview cache
///
/// # Example
///
/// ```
/// use libshelf_cache::PreviewCache;
/// use libshelf_render::{EncodedImage, ImageFormat, RawVisual};
///
/// let mut cache = PreviewCache::new();
/// let raw = RawVisual::Image(EncodedImage::new(ImageFormat::Png, 1, 1, vec![0]));
/// cache.insert(7, raw);
///
/// let for_thumbnail = cache.clone_entry(7).unwrap();
/// let for_popup = cache.clone_entry(7).unwrap();
/// assert_eq!(for_thumbnail, for_popup);
/// ```
pub struct PreviewCache {
    entries: HashMap<ItemId, VisualNode>,
    stats: CacheStats,
}

impl PreviewCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Normalize and store the master entry for an item
    ///
    /// Normally called at most once per id. The visibility and hover paths
    /// can race to populate the same id; both render the same document, so
    /// the overwrite is idempotent and last-write-wins is fine.
    pub fn insert(&mut self, id: ItemId, raw: RawVisual) {
        let node = normalize(raw);
        let added = node.byte_len();
        if let Some(previous) = self.entries.insert(id, node) {
            self.stats.resident_bytes -= previous.byte_len();
            log::debug!("preview cache overwrote master entry for item {}", id);
        }
        self.stats.resident_bytes += added;
        self.stats.entry_count = self.entries.len();
    }

    /// Look up the master entry, counting hit/miss
    pub fn get(&mut self, id: ItemId) -> Option<&VisualNode> {
        match self.entries.get(&id) {
            Some(node) => {
                self.stats.hits += 1;
                Some(node)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Check for a master entry without touching the counters
    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Independent duplicate of the master entry for one display site
    ///
    /// The clone can be attached, detached, or dropped without affecting
    /// any other clone or the master.
    pub fn clone_entry(&mut self, id: ItemId) -> Option<VisualNode> {
        self.get(id).cloned()
    }

    /// Number of master entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Usage counters
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every entry; used by service teardown
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.entry_count = 0;
        self.stats.resident_bytes = 0;
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded_raw(byte: u8) -> RawVisual {
        RawVisual::Image(EncodedImage::new(ImageFormat::Jpeg, 2, 3, vec![byte; 8]))
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = PreviewCache::new();
        assert!(cache.get(7).is_none());

        cache.insert(7, encoded_raw(1));
        let node = cache.get(7).unwrap();
        assert_eq!(node.width(), 2);
        assert_eq!(node.height(), 3);
    }

    #[test]
    fn test_hit_miss_counters() {
        let mut cache = PreviewCache::new();
        cache.get(1);
        cache.insert(1, encoded_raw(0));
        cache.get(1);
        cache.get(2);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert!((stats.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_surface_normalized_to_png() {
        let mut cache = PreviewCache::new();
        let surface = PixelSurface::new(4, 4);
        cache.insert(5, RawVisual::Surface(surface));

        let node = cache.get(5).unwrap();
        assert_eq!(node.image().format(), ImageFormat::Png);
        assert_eq!(node.width(), 4);
        assert_eq!(node.height(), 4);
        // PNG magic bytes: the surface really was encoded.
        assert_eq!(&node.image().bytes()[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_encoded_image_passes_through() {
        let raw = RawVisual::Image(EncodedImage::new(ImageFormat::Jpeg, 10, 20, vec![1, 2]));
        let node = normalize(raw);
        assert_eq!(node.image().format(), ImageFormat::Jpeg);
        assert_eq!(node.image().bytes(), &[1, 2]);
    }

    #[test]
    fn test_clone_entries_are_independent() {
        let mut cache = PreviewCache::new();
        cache.insert(7, encoded_raw(9));

        let a = cache.clone_entry(7).unwrap();
        let b = cache.clone_entry(7).unwrap();
        assert_eq!(a, b);

        // Dropping one consumer's clone leaves the other and the master
        // intact.
        drop(a);
        assert_eq!(b.byte_len(), 8);
        assert!(cache.contains(7));
    }

    #[test]
    fn test_overwrite_is_idempotent() {
        let mut cache = PreviewCache::new();
        cache.insert(7, encoded_raw(1));
        cache.insert(7, encoded_raw(1));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().entry_count, 1);
        assert_eq!(cache.stats().resident_bytes, 8);
    }

    #[test]
    fn test_no_eviction() {
        let mut cache = PreviewCache::new();
        for id in 0..1000 {
            cache.insert(id, encoded_raw((id % 256) as u8));
        }
        assert_eq!(cache.len(), 1000);
        for id in 0..1000 {
            assert!(cache.contains(id));
        }
    }

    #[test]
    fn test_clear() {
        let mut cache = PreviewCache::new();
        cache.insert(1, encoded_raw(1));
        cache.insert(2, encoded_raw(2));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().resident_bytes, 0);
        assert_eq!(cache.stats().entry_count, 0);
    }

    #[test]
    fn test_resident_bytes_tracks_entries() {
        let mut cache = PreviewCache::new();
        cache.insert(1, encoded_raw(1));
        cache.insert(2, encoded_raw(2));
        assert_eq!(cache.stats().resident_bytes, 16);
    }
}
