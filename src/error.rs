//! Error taxonomy for the search engine.
//!
//! Only the pattern-compile failure is a hard error that aborts a request.
//! Everything else (missing targets, unreadable files, walk failures) is
//! carried as a path-keyed string inside a [`crate::types::SearchResultBundle`]
//! so that a run always returns a usable bundle.

use thiserror::Error;

/// Errors that can abort a search before a bundle is produced.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
