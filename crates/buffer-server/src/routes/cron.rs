//! Manual batch and retention triggers.

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use pipeline::BatchReport;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Retention trigger result.
#[derive(Serialize)]
pub struct CleanupResponse {
    pub deleted: u64,
}

/// Run a batch now: poll, then summarize every user with pending items.
pub async fn run_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BatchReport>> {
    authorize(&state, &headers)?;
    info!("Manual batch triggered");
    let report = state.batch.run_batch().await?;
    Ok(Json(report))
}

/// Run the retention sweep now.
pub async fn run_cleanup(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CleanupResponse>> {
    authorize(&state, &headers)?;
    info!("Manual retention sweep triggered");
    let deleted = state.sweeper.sweep().await?;
    Ok(Json(CleanupResponse { deleted }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let secret = state.cron_secret.as_deref().ok_or(ServerError::NotConfigured)?;

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(ServerError::Unauthorized)?;

    if constant_time_eq(presented.as_bytes(), secret.as_bytes()) {
        Ok(())
    } else {
        Err(ServerError::Unauthorized)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
