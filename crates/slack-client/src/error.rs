//! Error types for slack-client.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when calling the Slack Web API.
#[derive(Debug, Error)]
pub enum SlackError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Slack answered `ok: false`.
    #[error("Slack API error in {method}: {error}")]
    Api { method: String, error: String },

    /// Non-success HTTP status other than 429.
    #[error("HTTP {status} from {method}: {body}")]
    Status {
        method: String,
        status: u16,
        body: String,
    },

    /// HTTP 429. `retry_after` is the server's hint, when present.
    #[error("rate limited by {method} (retry after {retry_after:?})")]
    RateLimited {
        method: String,
        retry_after: Option<Duration>,
    },

    /// Invalid configuration or missing credential.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SlackError {
    /// Whether this error is a rate-limit signal rather than a failure.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SlackError::RateLimited { .. })
    }

    /// Server-provided retry delay, if this is a rate-limit error with a hint.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SlackError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
