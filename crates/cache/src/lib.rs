//! libshelf Cache Library
//!
//! Process-lifetime preview cache shared by the visibility and hover
//! trigger paths, with the reusability normalizer that converts raw
//! rendered surfaces into immutable, cloneable visual nodes.

pub mod preview;

pub use preview::{normalize, CacheStats, ItemId, PreviewCache};
