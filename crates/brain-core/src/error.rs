//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur when calling the language model.
///
/// Every variant is a failure for the unit of work that triggered it;
/// callers never receive a partial digest.
#[derive(Debug, Error)]
pub enum BrainError {
    /// Required configuration (such as the API key) is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with an error status.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The provider answered, but the content was empty or malformed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
