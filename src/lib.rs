//! Parallel, bounded recursive regex search engine for local file trees.
//!
//! ```text
//!            ┌───────────────┐
//!            │  coordinator  │  validates pattern, owns one request
//!            └───────┬───────┘
//!           ┌─────────┴─────────┐
//!    ┌──────▼──────┐     ┌──────▼──────┐
//!    │  analyzer   │     │  enumerator │──► classifier
//!    └─────────────┘     └──────┬──────┘
//!                         ┌─────▼─────┐
//!                         │ dispatcher │──► matcher (per worker)
//!                         └────────────┘
//! ```
//!
//! The public surface is [`coordinator::search`]: compile the pattern,
//! enumerate eligible files, fan them out across a bounded worker pool, and
//! return a [`types::SearchResultBundle`]. Callers create a
//! [`types::SearchHandle`] up front and clone it before calling, so the
//! clone can poll progress or fire cancellation while the search runs.

pub mod analyzer;
pub mod classifier;
pub mod coordinator;
pub mod dispatcher;
pub mod enumerator;
pub mod error;
pub mod matcher;
pub mod sorting;
pub mod types;

pub use coordinator::{analyze_roots, search};
pub use error::EngineError;
pub use types::{
    EffectiveConfig, FileEntry, FolderAnalysis, MatchRecord, ProgressSnapshot, SearchHandle,
    SearchRequest, SearchResultBundle,
};
