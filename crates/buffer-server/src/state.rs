//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use pipeline::{BatchSummarizer, RetentionSweeper};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Batch summarizer, shared with the scheduler.
    pub batch: Arc<BatchSummarizer>,
    /// Retention sweeper, shared with the scheduler.
    pub sweeper: Arc<RetentionSweeper>,
    /// Bearer secret for the trigger endpoints.
    pub cron_secret: Option<Arc<str>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        batch: Arc<BatchSummarizer>,
        sweeper: Arc<RetentionSweeper>,
        cron_secret: Option<String>,
    ) -> Self {
        Self {
            db,
            batch,
            sweeper,
            cron_secret: cron_secret.map(Arc::from),
        }
    }
}
