//! Core data model: requests, configuration, file entries, match records,
//! progress snapshots, and the final result bundle.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use parking_lot::Mutex;

/// Sane ceiling on worker concurrency regardless of what a caller requests.
pub const MAX_CONCURRENCY_CEILING: usize = 128;

/// Minimum allowed per-file size cap.
pub const MIN_FILE_SIZE_CAP: u64 = 1024;

const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
const DEFAULT_MAX_RESULTS: usize = 10_000;
const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Immutable, per-request search tuning. Invariants are enforced by
/// [`EffectiveConfig::new`]; nothing downstream mutates a config in place.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveConfig {
    pub max_file_size: u64,
    pub max_results: usize,
    pub max_concurrency: usize,
    pub case_sensitive: bool,
    pub auto_configured: bool,
}

impl EffectiveConfig {
    pub fn new(
        max_file_size: u64,
        max_results: usize,
        max_concurrency: usize,
        case_sensitive: bool,
        auto_configured: bool,
    ) -> Self {
        Self {
            max_file_size: max_file_size.max(MIN_FILE_SIZE_CAP),
            max_results: max_results.max(1),
            max_concurrency: max_concurrency.clamp(1, MAX_CONCURRENCY_CEILING),
            case_sensitive,
            auto_configured,
        }
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_results: DEFAULT_MAX_RESULTS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            case_sensitive: true,
            auto_configured: false,
        }
    }
}

/// Immutable search input. Destroyed once the result bundle is returned.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub pattern: String,
    pub roots: Vec<PathBuf>,
    pub config: EffectiveConfig,
}

impl SearchRequest {
    pub fn new(pattern: impl Into<String>, roots: Vec<PathBuf>, config: EffectiveConfig) -> Self {
        Self {
            pattern: pattern.into(),
            roots,
            config,
        }
    }
}

/// One eligible file discovered by the enumerator.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// One non-overlapping regex match on one line of one file.
///
/// Invariant: `0 <= match_start < match_end <= line.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub path: PathBuf,
    pub line_number: u64,
    pub line: String,
    pub match_start: usize,
    pub match_end: usize,
    pub file_size: u64,
    pub modified: Option<SystemTime>,
}

/// Shared, atomically-updated progress state for one in-flight run.
///
/// Workers publish to this on every file start/completion; a caller may
/// poll [`ProgressState::snapshot`] concurrently with the search.
pub struct ProgressState {
    pub total_files: AtomicUsize,
    pub total_bytes: AtomicU64,
    pub processed_files: AtomicUsize,
    pub processed_bytes: AtomicU64,
    pub match_count: AtomicUsize,
    pub error_count: AtomicUsize,
    pub cancelled: AtomicBool,
    current_file: Mutex<String>,
    pub started_at: Instant,
}

impl ProgressState {
    pub fn new(total_files: usize, total_bytes: u64) -> Self {
        Self {
            total_files: AtomicUsize::new(total_files),
            total_bytes: AtomicU64::new(total_bytes),
            processed_files: AtomicUsize::new(0),
            processed_bytes: AtomicU64::new(0),
            match_count: AtomicUsize::new(0),
            error_count: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            current_file: Mutex::new(String::new()),
            started_at: Instant::now(),
        }
    }

    pub fn set_current_file(&self, path: &std::path::Path) {
        *self.current_file.lock() = path.display().to_string();
    }

    /// Eventually-consistent copy of the progress state. Torn reads of
    /// `current_file` relative to the atomic counters are acceptable — it's
    /// a display hint, not part of any invariant.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            total_files: self.total_files.load(Ordering::Relaxed),
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            processed_files: self.processed_files.load(Ordering::Relaxed),
            processed_bytes: self.processed_bytes.load(Ordering::Relaxed),
            match_count: self.match_count.load(Ordering::Relaxed),
            error_count: self.error_count.load(Ordering::Relaxed),
            current_file: self.current_file.lock().clone(),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            elapsed: self.started_at.elapsed(),
        }
    }
}

/// A point-in-time, caller-visible copy of [`ProgressState`].
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    pub total_files: usize,
    pub total_bytes: u64,
    pub processed_files: usize,
    pub processed_bytes: u64,
    pub match_count: usize,
    pub error_count: usize,
    pub current_file: String,
    pub cancelled: bool,
    pub elapsed: std::time::Duration,
}

/// The result of one completed (or cancelled, or truncated) search.
#[derive(Debug, Clone)]
pub struct SearchResultBundle {
    pub pattern: String,
    pub target_description: String,
    pub results: Vec<MatchRecord>,
    pub suggestions: Vec<String>,
    pub errors: Vec<String>,
    pub total_eligible_files: usize,
    pub elapsed: std::time::Duration,
    pub progress: ProgressSnapshot,
    pub truncated: bool,
}

impl SearchResultBundle {
    /// The sole hard-failure bundle: an uncompilable pattern.
    pub fn invalid_pattern(pattern: &str, reason: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            target_description: String::new(),
            results: Vec::new(),
            suggestions: Vec::new(),
            errors: vec![format!("Invalid regex pattern: {reason}")],
            total_eligible_files: 0,
            elapsed: std::time::Duration::ZERO,
            progress: ProgressState::new(0, 0).snapshot(),
            truncated: false,
        }
    }
}

/// Shared handle a caller uses to observe progress and request cancellation.
///
/// Unifies what the engine treats as two separate external interfaces
/// (a progress-polling accessor and a single-shot cancellation signal)
/// into one caller-held object, since both are read/written against the
/// same `Arc<ProgressState>` for one request.
#[derive(Clone)]
pub struct SearchHandle {
    progress: Arc<ProgressState>,
}

impl SearchHandle {
    /// Create a fresh handle for one request. Clone it before handing the
    /// original to [`crate::coordinator::search`] so the clone can poll
    /// progress and fire cancellation while the search runs concurrently.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(ProgressState::new(0, 0)),
        }
    }

    pub(crate) fn progress_state(&self) -> &Arc<ProgressState> {
        &self.progress
    }

    /// Read-only accessor; safe to call concurrently with the search.
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// Single-shot; firing more than once is idempotent.
    pub fn cancel(&self) {
        self.progress.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.progress.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for SearchHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics gathered by the folder analyzer over a set of roots.
#[derive(Debug, Clone, Default)]
pub struct FolderAnalysis {
    pub total_files: usize,
    pub total_bytes: u64,
    pub largest_file: u64,
    pub average_file_size: f64,
    pub hidden_count: usize,
    pub binary_count: usize,
    pub text_count: usize,
    pub large_file_count: usize,
}

impl FolderAnalysis {
    /// Derive a recommended configuration scaled to what was observed.
    /// Never lowers below the defaults; only ever raises them.
    pub fn recommended_config(&self) -> EffectiveConfig {
        let default = EffectiveConfig::default();

        let max_file_size = if self.total_files == 0 {
            default.max_file_size
        } else if self.largest_file <= 1024 * 1024 {
            10 * 1024 * 1024
        } else if self.largest_file <= 10 * 1024 * 1024 {
            50 * 1024 * 1024
        } else if self.largest_file <= 100 * 1024 * 1024 {
            500 * 1024 * 1024
        } else {
            2 * 1024 * 1024 * 1024
        };

        let max_results = if self.total_files <= 1_000 {
            5_000
        } else if self.total_files <= 10_000 {
            15_000
        } else if self.total_files <= 50_000 {
            30_000
        } else {
            50_000
        };

        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let max_concurrency = if self.total_files <= 100 {
            cpus.min(10)
        } else if self.total_files <= 1_000 {
            (cpus * 2).min(25)
        } else {
            (cpus * 3).min(100)
        }
        .max(1);

        EffectiveConfig::new(
            max_file_size,
            max_results,
            max_concurrency,
            default.case_sensitive,
            true,
        )
    }
}
