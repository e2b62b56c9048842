//! Deletion of old processed items.

use std::time::Duration;

use database::{item, Database};
use tracing::info;

use crate::error::{PipelineError, Result};

/// Deletes processed Slack items older than the retention window.
///
/// Pending items and saved links are never touched. The sweep is global,
/// not scoped to a user.
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    database: Database,
    retention: Duration,
}

impl RetentionSweeper {
    pub fn new(database: Database, retention: Duration) -> Self {
        Self {
            database,
            retention,
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Delete eligible rows and return how many went.
    pub async fn sweep(&self) -> Result<u64> {
        if self.database.is_closed() {
            return Err(PipelineError::StoreUnavailable);
        }

        let deleted =
            item::delete_processed_older_than(self.database.pool(), self.retention).await?;
        info!(
            "Retention sweep removed {} items older than {} days",
            deleted,
            self.retention.as_secs() / 86_400
        );
        Ok(deleted)
    }
}
