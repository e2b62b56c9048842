//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub database: String,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = if state.db.is_closed() { "closed" } else { "ok" };
    Json(Health {
        status: "ok".to_string(),
        database: database.to_string(),
    })
}
