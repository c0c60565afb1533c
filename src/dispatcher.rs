//! Parallel dispatcher: the worker pool. Fans a pre-enumerated file list out
//! across a fixed number of OS threads, merges their output under a result
//! cap, and returns everything the collector gathered before completion,
//! cancellation, or truncation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::matcher::{search_file, CompiledPattern};
use crate::types::{EffectiveConfig, FileEntry, MatchRecord, ProgressState, SearchHandle};

const RESULTS_CHANNEL_CAPACITY: usize = 1024;
const MAX_DETAILED_ERRORS: usize = 100;
const MAX_SUGGESTIONS: usize = 10;
/// Above this many files the suggestion pass is skipped to avoid a second
/// full-tree read on top of the search itself.
const SUGGESTION_FILE_COUNT_THRESHOLD: usize = 5_000;

pub struct DispatchOutcome {
    pub results: Vec<MatchRecord>,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
    pub truncated: bool,
}

/// Run the worker pool over `files` and collect a bounded, ordered result.
///
/// State machine: Dispatching -> (cap reached) -> Draining -> done. A
/// cancellation observed by any worker short-circuits its own loop; the
/// collector keeps draining whatever is already in flight so no worker is
/// ever left blocked on a full channel.
pub fn dispatch(
    pattern: &CompiledPattern,
    files: &[FileEntry],
    config: &EffectiveConfig,
    progress: &Arc<ProgressState>,
    handle: &SearchHandle,
) -> DispatchOutcome {
    let worker_count = config.max_concurrency.min(files.len().max(1));
    let cursor = AtomicUsize::new(0);
    let errors: Mutex<Vec<String>> = Mutex::new(Vec::new());
    let suggestions: Mutex<Vec<String>> = Mutex::new(Vec::new());
    let collect_suggestions = files.len() <= SUGGESTION_FILE_COUNT_THRESHOLD;

    let mut results = Vec::new();
    let mut truncated = false;

    std::thread::scope(|scope| {
        let (tx, rx) = mpsc::sync_channel::<Vec<MatchRecord>>(RESULTS_CHANNEL_CAPACITY);

        for _ in 0..worker_count {
            let tx = tx.clone();
            let cursor = &cursor;
            let errors = &errors;
            let suggestions = &suggestions;
            scope.spawn(move || {
                loop {
                    if handle.is_cancelled() {
                        progress.cancelled.store(true, Ordering::Relaxed);
                        break;
                    }

                    let idx = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(entry) = files.get(idx) else {
                        break;
                    };

                    progress.set_current_file(&entry.path);
                    let outcome = search_file(pattern, entry, handle, collect_suggestions);

                    progress.processed_files.fetch_add(1, Ordering::Relaxed);
                    progress.processed_bytes.fetch_add(entry.size, Ordering::Relaxed);

                    if let Some(err) = outcome.error {
                        progress.error_count.fetch_add(1, Ordering::Relaxed);
                        let mut errors = errors.lock();
                        if errors.len() < MAX_DETAILED_ERRORS {
                            errors.push(err);
                        }
                        continue;
                    }

                    if !outcome.suggestion_candidates.is_empty() {
                        let mut suggestions = suggestions.lock();
                        for candidate in outcome.suggestion_candidates {
                            if suggestions.len() >= MAX_SUGGESTIONS {
                                break;
                            }
                            if !suggestions.contains(&candidate) {
                                suggestions.push(candidate);
                            }
                        }
                    }

                    if handle.is_cancelled() {
                        progress.cancelled.store(true, Ordering::Relaxed);
                        break;
                    }

                    if !outcome.records.is_empty() {
                        progress
                            .match_count
                            .fetch_add(outcome.records.len(), Ordering::Relaxed);
                        // A send only blocks while the collector is still
                        // admitting; once draining starts the collector
                        // keeps receiving, so this never deadlocks.
                        let _ = tx.send(outcome.records);
                    }
                }
            });
        }
        drop(tx);

        while let Ok(batch) = rx.recv() {
            if truncated {
                continue;
            }
            for record in batch {
                results.push(record);
                if results.len() >= config.max_results {
                    truncated = true;
                    break;
                }
            }
        }
    });

    DispatchOutcome {
        results,
        errors: errors.into_inner(),
        suggestions: suggestions.into_inner(),
        truncated,
    }
}
