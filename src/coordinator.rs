//! Search coordinator: the public entry point. Validates the pattern,
//! resolves configuration, enumerates, dispatches, and returns a result
//! bundle.

use std::path::PathBuf;
use std::time::Instant;

use log::{debug, warn};

use crate::analyzer::analyze;
use crate::dispatcher::dispatch;
use crate::enumerator::enumerate;
use crate::matcher::CompiledPattern;
use crate::sorting::sort_records;
use crate::types::{EffectiveConfig, SearchHandle, SearchRequest, SearchResultBundle};

/// Run one search to completion.
///
/// `handle` is the caller's cancellation/progress handle — clone it before
/// calling so the clone can poll [`SearchHandle::progress`] or fire
/// [`SearchHandle::cancel`] while this future runs concurrently (e.g. from
/// another spawned task). The blocking worker pool runs on a dedicated
/// blocking thread pool so this future never stalls the async executor it's
/// awaited from.
pub async fn search(request: SearchRequest, handle: SearchHandle) -> SearchResultBundle {
    tokio::task::spawn_blocking(move || run(request, handle))
        .await
        .unwrap_or_else(|e| {
            warn!("search worker pool panicked: {e}");
            SearchResultBundle::invalid_pattern("", "search task panicked")
        })
}

/// The synchronous core, suitable for calling directly from a blocking
/// context without going through the async bridge above.
pub fn run(request: SearchRequest, handle: SearchHandle) -> SearchResultBundle {
    let started = Instant::now();
    let progress = handle.progress_state().clone();
    let target_description = describe_targets(&request.roots);

    let pattern = match CompiledPattern::compile(&request.pattern, request.config.case_sensitive) {
        Ok(p) => p,
        Err(crate::error::EngineError::InvalidPattern(reason)) => {
            return SearchResultBundle::invalid_pattern(&request.pattern, &reason)
        }
        Err(err) => return SearchResultBundle::invalid_pattern(&request.pattern, &err.to_string()),
    };

    let roots = resolve_targets(&request.roots);
    let mut errors = roots.errors;

    let config = if request.config.auto_configured {
        analyze(&roots.existing, request.config.max_file_size).recommended_config()
    } else {
        request.config
    };

    let enumeration = enumerate(&roots.existing, config.max_file_size, &handle);
    errors.extend(enumeration.errors);

    progress
        .total_files
        .store(enumeration.entries.len(), std::sync::atomic::Ordering::Relaxed);
    progress
        .total_bytes
        .store(enumeration.total_bytes, std::sync::atomic::Ordering::Relaxed);

    if enumeration.entries.is_empty() {
        errors.push("No searchable files found under the given roots".to_string());
        return SearchResultBundle {
            pattern: request.pattern,
            target_description,
            results: Vec::new(),
            suggestions: Vec::new(),
            errors,
            total_eligible_files: 0,
            elapsed: started.elapsed(),
            progress: progress.snapshot(),
            truncated: false,
        };
    }

    debug!(
        "dispatching search over {} eligible files",
        enumeration.entries.len()
    );

    let outcome = dispatch(&pattern, &enumeration.entries, &config, &progress, &handle);

    let mut results = outcome.results;
    sort_records(&mut results);
    errors.extend(outcome.errors);

    SearchResultBundle {
        pattern: request.pattern,
        target_description,
        results,
        suggestions: outcome.suggestions,
        errors,
        total_eligible_files: enumeration.entries.len(),
        elapsed: started.elapsed(),
        progress: progress.snapshot(),
        truncated: outcome.truncated,
    }
}

struct ResolvedTargets {
    existing: Vec<PathBuf>,
    errors: Vec<String>,
}

fn resolve_targets(roots: &[PathBuf]) -> ResolvedTargets {
    let mut existing = Vec::new();
    let mut errors = Vec::new();

    for root in roots {
        if root.exists() {
            existing.push(root.clone());
        } else {
            errors.push(format!("{}: no such file or directory", root.display()));
        }
    }

    ResolvedTargets { existing, errors }
}

fn describe_targets(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Adjacent, synchronous API mirroring the language-neutral
/// `analyze(roots) -> FolderAnalysis` operation.
pub fn analyze_roots(roots: &[PathBuf]) -> crate::types::FolderAnalysis {
    analyze(roots, EffectiveConfig::default().max_file_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn request(pattern: &str, roots: Vec<PathBuf>) -> SearchRequest {
        SearchRequest::new(pattern, roots, EffectiveConfig::default())
    }

    #[test]
    fn invalid_pattern_is_the_sole_hard_failure() {
        let bundle = run(request("[unclosed", vec![]), SearchHandle::new());
        assert!(bundle.results.is_empty());
        assert!(!bundle.truncated);
        assert_eq!(bundle.errors.len(), 1);
        assert!(bundle.errors[0].contains("Invalid regex pattern"));
    }

    #[test]
    fn missing_target_is_reported_but_not_fatal() {
        let bundle = run(
            request("foo", vec![PathBuf::from("/no/such/dir")]),
            SearchHandle::new(),
        );
        assert!(bundle.errors.iter().any(|e| e.contains("no such file")));
    }

    #[test]
    fn single_file_two_matches_on_one_line() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "foo bar foo\n").unwrap();

        let bundle = run(request("foo", vec![file]), SearchHandle::new());

        assert_eq!(bundle.results.len(), 2);
        assert_eq!(bundle.results[0].match_start, 0);
        assert_eq!(bundle.results[0].match_end, 3);
        assert_eq!(bundle.results[1].match_start, 8);
        assert_eq!(bundle.results[1].match_end, 11);
    }
}
