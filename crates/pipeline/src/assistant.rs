//! Questions answered from the user's latest digest.

use std::sync::Arc;

use brain_core::Summarizer;
use database::{summary, Database};
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Answers questions using the newest digest as the only context.
#[derive(Clone)]
pub struct Assistant {
    database: Database,
    brain: Arc<dyn Summarizer>,
}

impl Assistant {
    pub fn new(database: Database, brain: Arc<dyn Summarizer>) -> Self {
        Self { database, brain }
    }

    /// Answer `question` for `user_id`. Fails when the user has no digest yet.
    pub async fn answer(&self, user_id: &str, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PipelineError::InvalidInput("question is empty".to_string()));
        }

        let latest = summary::latest_for_user(self.database.pool(), user_id)
            .await?
            .ok_or_else(|| PipelineError::NoSummary(user_id.to_string()))?;

        debug!(user_id = %user_id, summary_id = %latest.id, "Answering from latest digest");
        Ok(self
            .brain
            .answer_question(&latest.summary_text, question)
            .await?)
    }
}
