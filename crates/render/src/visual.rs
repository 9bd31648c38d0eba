//! Visual value types flowing from renderer adapters to display sites
//!
//! A renderer adapter produces a [`RawVisual`]: either a mutable pixel
//! surface (the paginated-document rasterizer draws into one) or encoded
//! image bytes lifted straight out of an archive. The preview cache
//! normalizes raw visuals into [`VisualNode`]s, the cloneable unit that
//! display sites attach.

use std::sync::Arc;

/// Encoded image container format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Resolve a format from a MIME type string
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    /// Conventional file extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// Mutable RGBA drawing surface
///
/// This is what a rasterizing backend draws into. Surfaces are never
/// handed to display sites directly: they cannot be shared across
/// simultaneous consumers, so the cache converts them to an
/// [`EncodedImage`] first.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelSurface {
    /// Create a surface filled with opaque white
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![255u8; (width * height * 4) as usize],
        }
    }

    /// Wrap an existing RGBA buffer (4 bytes per pixel, row-major)
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Surface width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable RGBA bytes
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Memory footprint of the pixel buffer in bytes
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

/// Immutable, directly-embeddable encoded image
///
/// The bytes are shared behind an `Arc`, so cloning an encoded image (or a
/// [`VisualNode`] wrapping one) is cheap and can never let one consumer
/// mutate pixels out from under another.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    format: ImageFormat,
    width: u32,
    height: u32,
    bytes: Arc<[u8]>,
}

impl EncodedImage {
    /// Create an encoded image from finished bytes
    pub fn new(format: ImageFormat, width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            format,
            width,
            height,
            bytes: bytes.into(),
        }
    }

    /// Container format
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the encoded bytes
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

/// What a renderer adapter hands back
#[derive(Debug, Clone, PartialEq)]
pub enum RawVisual {
    /// A freshly rasterized drawing surface
    Surface(PixelSurface),

    /// Encoded image bytes that need no further conversion
    Image(EncodedImage),
}

/// Normalized, cloneable display unit
///
/// One master node per document lives in the preview cache; every display
/// site receives its own clone. Clones are structurally independent
/// values: detaching or replacing one has no effect on any other clone or
/// on the master, while the underlying encoded bytes stay shared and
/// immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    image: EncodedImage,
}

impl VisualNode {
    /// Wrap a normalized image into a display node
    pub fn new(image: EncodedImage) -> Self {
        Self { image }
    }

    /// The embedded image
    pub fn image(&self) -> &EncodedImage {
        &self.image
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Size of the encoded bytes
    pub fn byte_len(&self) -> usize {
        self.image.byte_len()
    }
}
