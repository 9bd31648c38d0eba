//! Filesystem scanner: the preview subsystem's item source
//!
//! Walks the configured roots, skips hidden files and directories, filters
//! by extension, and produces the ordered `LibraryItem` sequence the
//! listing consumes. Each scan yields a complete replacement set; nothing
//! is diffed against a previous scan.

use crate::item::{ItemId, LibraryItem};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Counters for one scan pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files matching an indexed extension
    pub scanned: usize,

    /// Items actually produced
    pub indexed: usize,

    /// Matching files dropped because stat failed
    pub skipped: usize,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Collect the files under `roots` carrying one of `extensions`
///
/// Hidden directories are pruned from the walk entirely; a root that does
/// not exist contributes nothing. Results are path-sorted so repeated
/// scans of an unchanged tree produce an identical ordering.
pub fn iter_files(roots: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in roots {
        if !root.exists() {
            log::warn!("scan root {} does not exist", root.display());
            continue;
        }
        let walk = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walk.flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_ascii_lowercase())
                .unwrap_or_default();
            if extensions.iter().any(|allowed| *allowed == ext) {
                files.push(path.to_path_buf());
            }
        }
    }
    files.sort();
    files
}

/// Scan the roots into an ordered listing
///
/// Item ids are assigned sequentially from 1 in listing order.
pub fn scan_roots(roots: &[PathBuf], extensions: &[String]) -> (Vec<LibraryItem>, ScanStats) {
    let files = iter_files(roots, extensions);
    let mut stats = ScanStats {
        scanned: files.len(),
        ..Default::default()
    };

    let mut items = Vec::with_capacity(files.len());
    for path in &files {
        match std::fs::metadata(path) {
            Ok(meta) => {
                let id = (items.len() + 1) as ItemId;
                items.push(LibraryItem::from_path(id, path, meta.len()));
            }
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                stats.skipped += 1;
            }
        }
    }
    stats.indexed = items.len();
    log::info!(
        "scan complete: {} scanned, {} indexed, {} skipped",
        stats.scanned,
        stats.indexed,
        stats.skipped
    );
    (items, stats)
}

/// Convenience for a single root
pub fn scan_root(root: &Path, extensions: &[String]) -> (Vec<LibraryItem>, ScanStats) {
    scan_roots(&[root.to_path_buf()], extensions)
}
