//! Route handlers for the buffer server.

pub mod cron;
pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Manual triggers, gated by CRON_SECRET
        .route("/api/cron/batch", post(cron::run_batch))
        .route("/api/cron/cleanup", post(cron::run_cleanup))
}
