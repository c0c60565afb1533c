//! Folder analyzer: produces statistics over a set of roots and derives a
//! recommended configuration for auto-configured requests.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::classifier::is_searchable;
use crate::types::{EffectiveConfig, FolderAnalysis};

/// Walk `roots` and tally per-file statistics. Unlike the enumerator, the
/// classifier here only decides the hidden/binary/large buckets to count —
/// it never excludes a file from the tally.
pub fn analyze(roots: &[PathBuf], max_file_size_for_large_bucket: u64) -> FolderAnalysis {
    let mut stats = FolderAnalysis::default();

    for root in roots {
        let root: &Path = root.as_ref();
        let Ok(metadata) = std::fs::symlink_metadata(root) else {
            continue;
        };

        if metadata.is_file() {
            tally(&mut stats, root, metadata.len(), max_file_size_for_large_bucket);
            continue;
        }

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .build();

        for entry in walker.flatten() {
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            tally(&mut stats, entry.path(), meta.len(), max_file_size_for_large_bucket);
        }
    }

    if stats.total_files > 0 {
        stats.average_file_size = stats.total_bytes as f64 / stats.total_files as f64;
    }

    stats
}

fn tally(stats: &mut FolderAnalysis, path: &Path, size: u64, current_cap: u64) {
    stats.total_files += 1;
    stats.total_bytes += size;
    stats.largest_file = stats.largest_file.max(size);

    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false);

    if hidden {
        stats.hidden_count += 1;
    } else if size > current_cap {
        stats.large_file_count += 1;
    }

    if is_searchable(path, size, current_cap) {
        stats.text_count += 1;
    } else if !hidden && size <= current_cap {
        stats.binary_count += 1;
    }
}

/// Convenience: analyze then immediately derive the recommended config.
pub fn recommend(roots: &[PathBuf], current_cap: u64) -> EffectiveConfig {
    analyze(roots, current_cap).recommended_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn tallies_files_and_derives_defaults_for_small_tree() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::write(dir.path().join("b.png"), "binary").unwrap();

        let stats = analyze(&[dir.path().to_path_buf()], 100 * 1024 * 1024);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.text_count, 1);
        assert_eq!(stats.binary_count, 1);

        let config = stats.recommended_config();
        assert!(config.auto_configured);
        assert!(config.max_concurrency >= 1);
    }

    #[test]
    fn empty_tree_keeps_default_file_size_cap() {
        let dir = tempdir().unwrap();
        let stats = analyze(&[dir.path().to_path_buf()], 100 * 1024 * 1024);
        let config = stats.recommended_config();
        assert_eq!(config.max_file_size, EffectiveConfig::default().max_file_size);
    }
}
