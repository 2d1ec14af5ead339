//! Error types for feed generation.

use thiserror::Error;

/// Fatal failures of a single feed conversion.
///
/// Per-row problems never show up here: malformed rows are skipped and
/// unrepairable text is passed through as-is.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Invalid JSON from upstream: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Expected a JSON array of schedule rows, got {0}")]
    NotAnArray(&'static str),

    #[error("Unsupported timezone: {0}")]
    UnsupportedTimezone(String),
}

/// Result type alias for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
