//! HTTP trigger surface and process wiring for the message buffer.
//!
//! Exposes a health check and two secret-gated triggers that run the same
//! batch and retention functions the scheduler fires.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

pub use config::{Config, ConfigError};
pub use error::ServerError;
pub use state::AppState;

/// Build the application with state attached.
pub fn app(state: AppState) -> Router {
    routes::router().with_state(state)
}
