//! File classifier: decides whether a single path is searchable.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;

static BINARY_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "exe", "bin", "so", "dll", "dylib", "a", "o", "jpg", "jpeg", "png", "gif", "bmp", "ico",
        "mp3", "mp4", "avi", "mov", "wav", "flac", "zip", "tar", "gz", "bz2", "xz", "7z", "pdf",
        "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    ]
    .into_iter()
    .collect()
});

/// A file is searchable iff its basename isn't hidden, it's within the
/// size cap, and its extension isn't a known binary one. Unknown
/// extensions are text-by-default; content is never sniffed.
pub fn is_searchable(path: &Path, size: u64, max_file_size: u64) -> bool {
    if is_hidden(path) {
        return false;
    }
    if size > max_file_size {
        return false;
    }
    !is_binary_extension(path)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| BINARY_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn hidden_files_excluded() {
        assert!(!is_searchable(&PathBuf::from(".hidden.txt"), 10, 1024));
    }

    #[test]
    fn oversized_files_excluded() {
        assert!(!is_searchable(&PathBuf::from("big.txt"), 2048, 1024));
    }

    #[test]
    fn binary_extensions_excluded_case_insensitively() {
        assert!(!is_searchable(&PathBuf::from("photo.PNG"), 10, 1024));
    }

    #[test]
    fn unknown_extensions_are_text_by_default() {
        assert!(is_searchable(&PathBuf::from("notes.xyz"), 10, 1024));
    }

    #[test]
    fn plain_text_is_searchable() {
        assert!(is_searchable(&PathBuf::from("code.txt"), 10, 1024));
    }
}
