//! Error types for the buffer server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ServerError {
    /// No `CRON_SECRET` is configured.
    #[error("Trigger endpoints are not configured")]
    NotConfigured,

    /// Missing or wrong bearer secret.
    #[error("Unauthorized")]
    Unauthorized,

    /// The pipeline run failed.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] pipeline::PipelineError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::Pipeline(err) => {
                tracing::error!("Pipeline error: {}", err);
                if err.is_store_unavailable() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ServerError>;
