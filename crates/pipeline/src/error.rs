//! Error types for pipeline operations.

use brain_core::BrainError;
use database::DatabaseError;
use slack_client::SlackError;
use thiserror::Error;

/// Errors that can occur while polling, summarizing or acting on items.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The store is closed or was never opened.
    #[error("store unavailable")]
    StoreUnavailable,

    /// Persistence failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Summarizer call failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Slack call failed.
    #[error("slack error: {0}")]
    Slack(#[from] SlackError),

    /// The user has no digest to answer from.
    #[error("no summary available for user {0}")]
    NoSummary(String),

    /// The workspace has no usable token.
    #[error("workspace {0} has no credential")]
    MissingCredential(String),

    /// Rejected input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A schedule expression failed to parse.
    #[error("invalid schedule {expression:?}: {reason}")]
    Schedule { expression: String, reason: String },
}

impl PipelineError {
    /// Whether the store is gone and the whole run must stop.
    pub fn is_store_unavailable(&self) -> bool {
        match self {
            PipelineError::StoreUnavailable => true,
            PipelineError::Database(e) => e.is_unavailable(),
            _ => false,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
