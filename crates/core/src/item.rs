//! Library item model
//!
//! One `LibraryItem` per indexed file. Items are owned by the current
//! listing/search result set, immutable for the lifetime of one render
//! pass, and replaced wholesale on every scan or search.

use libshelf_render::DocumentKind;
use std::path::{Path, PathBuf};

/// Unique identifier for a library item
pub type ItemId = u64;

/// One indexed document in the library
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LibraryItem {
    /// Item identifier, stable within one listing
    pub id: ItemId,

    /// File name including extension
    pub name: String,

    /// Absolute path to the file
    pub path: PathBuf,

    /// Lowercased extension without the dot
    pub ext: String,

    /// Whether the user starred the item
    pub starred: bool,

    /// File size in bytes
    pub size: u64,

    /// Optional search-match snippet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl LibraryItem {
    /// Build an item from a path and stat data
    pub fn from_path(id: ItemId, path: &Path, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        Self {
            id,
            name,
            path: path.to_path_buf(),
            ext,
            starred: false,
            size,
            snippet: None,
        }
    }

    /// Document kind for preview rendering, `None` when unsupported
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_ext(&self.ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_fields() {
        let item = LibraryItem::from_path(3, Path::new("/books/Rust in Action.PDF"), 1024);
        assert_eq!(item.id, 3);
        assert_eq!(item.name, "Rust in Action.PDF");
        assert_eq!(item.ext, "pdf");
        assert_eq!(item.size, 1024);
        assert!(!item.starred);
        assert!(item.snippet.is_none());
    }

    #[test]
    fn test_kind_resolution() {
        let pdf = LibraryItem::from_path(1, Path::new("/a/b.pdf"), 0);
        assert_eq!(pdf.kind(), Some(DocumentKind::Paginated));

        let epub = LibraryItem::from_path(2, Path::new("/a/b.epub"), 0);
        assert_eq!(epub.kind(), Some(DocumentKind::Archive));

        let txt = LibraryItem::from_path(3, Path::new("/a/b.txt"), 0);
        assert_eq!(txt.kind(), None);

        let bare = LibraryItem::from_path(4, Path::new("/a/noext"), 0);
        assert_eq!(bare.ext, "");
        assert_eq!(bare.kind(), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let item = LibraryItem::from_path(9, Path::new("/lib/guide.epub"), 77);
        let json = serde_json::to_string(&item).unwrap();
        let back: LibraryItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }
}
