//! File enumerator: walks the request roots and yields an ordered,
//! classifier-filtered file list plus an aggregate byte total.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::classifier::is_searchable;
use crate::types::{FileEntry, SearchHandle};

/// Result of one enumeration pass: the ordered eligible files, their
/// aggregate size, and any path-level errors encountered along the way.
pub struct EnumerationResult {
    pub entries: Vec<FileEntry>,
    pub total_bytes: u64,
    pub errors: Vec<String>,
}

/// Walk `roots`, applying the classifier to every non-directory entry.
/// Traversal is single-threaded and sorted by file name so the output is
/// deterministic for a given filesystem snapshot; the worker pool fans
/// out over this list afterwards, it does not re-walk.
pub fn enumerate(roots: &[PathBuf], max_file_size: u64, handle: &SearchHandle) -> EnumerationResult {
    let mut entries = Vec::new();
    let mut errors = Vec::new();
    let mut total_bytes = 0u64;

    for root in roots {
        let root: &Path = root.as_ref();
        if handle.is_cancelled() {
            break;
        }

        let metadata = match std::fs::symlink_metadata(root) {
            Ok(m) => m,
            Err(e) => {
                errors.push(format!("{}: {e}", root.display()));
                continue;
            }
        };

        if metadata.is_file() {
            if is_searchable(root, metadata.len(), max_file_size) {
                total_bytes += metadata.len();
                entries.push(FileEntry {
                    path: root.to_path_buf(),
                    size: metadata.len(),
                    modified: metadata.modified().ok(),
                });
            }
            continue;
        }

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for result in walker {
            if handle.is_cancelled() {
                break;
            }
            match result {
                Ok(entry) => {
                    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                    if is_dir {
                        continue;
                    }
                    let Ok(meta) = entry.metadata() else {
                        errors.push(format!("{}: unable to stat", entry.path().display()));
                        continue;
                    };
                    if is_searchable(entry.path(), meta.len(), max_file_size) {
                        total_bytes += meta.len();
                        entries.push(FileEntry {
                            path: entry.path().to_path_buf(),
                            size: meta.len(),
                            modified: meta.modified().ok(),
                        });
                    }
                }
                Err(e) => errors.push(e.to_string()),
            }
        }
    }

    EnumerationResult {
        entries,
        total_bytes,
        errors,
    }
}
