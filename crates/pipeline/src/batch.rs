//! Batch digest generation for every user with pending items.

use std::sync::Arc;

use brain_core::Summarizer;
use database::{item, summary, user_settings, Database, Item, SourceType};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{PipelineError, Result};
use crate::poller::{PollReport, SourcePoller};

/// Digest produced for one user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserDigest {
    pub user_id: String,
    pub summary_id: String,
    pub processed_count: usize,
    pub summary_text: String,
    pub key_topics: Vec<String>,
}

/// Result of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub users_processed: usize,
    pub results: Vec<UserDigest>,
    #[serde(skip)]
    pub poll: PollReport,
}

/// Polls sources, then turns each user's pending items into a digest.
#[derive(Clone)]
pub struct BatchSummarizer {
    database: Database,
    poller: SourcePoller,
    brain: Arc<dyn Summarizer>,
}

impl BatchSummarizer {
    pub fn new(database: Database, poller: SourcePoller, brain: Arc<dyn Summarizer>) -> Self {
        Self {
            database,
            poller,
            brain,
        }
    }

    pub fn poller(&self) -> &SourcePoller {
        &self.poller
    }

    /// Run one batch.
    ///
    /// Users are processed one after another. A summarization failure for
    /// one user is logged and that user's items stay pending for the next
    /// run. A status update failure after the digest was stored is logged
    /// and the digest is kept.
    pub async fn run_batch(&self) -> Result<BatchReport> {
        if self.database.is_closed() {
            return Err(PipelineError::StoreUnavailable);
        }

        let poll = self.poller.poll().await?;
        let user_ids = item::pending_user_ids(self.database.pool()).await?;
        let mut report = BatchReport {
            poll,
            ..BatchReport::default()
        };

        if user_ids.is_empty() {
            info!("Batch: no pending items");
            return Ok(report);
        }

        info!("Batch: {} users with pending items", user_ids.len());

        for user_id in &user_ids {
            match self.summarize_user(user_id).await {
                Ok(Some(digest)) => report.results.push(digest),
                Ok(None) => {}
                Err(e) if e.is_store_unavailable() => return Err(e),
                Err(e) => warn!(user_id = %user_id, error = %e, "Skipping user for this batch"),
            }
        }

        report.users_processed = report.results.len();
        info!("Batch complete: {} users summarized", report.users_processed);
        Ok(report)
    }

    async fn summarize_user(&self, user_id: &str) -> Result<Option<UserDigest>> {
        let pool = self.database.pool();
        let batch_size = self.poller.settings().batch_size;

        let items = item::pending_for_user(pool, user_id, batch_size).await?;
        if items.is_empty() {
            return Ok(None);
        }

        let instructions = match user_settings::get_custom_instructions(pool, user_id).await {
            Ok(instructions) => instructions,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Could not load custom instructions");
                None
            }
        };

        let lines: Vec<String> = items.iter().map(format_item).collect();
        let digest = self
            .brain
            .summarize(&lines, instructions.as_deref())
            .await?;

        let ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
        let stored = summary::insert_summary(pool, user_id, &digest.summary_text, &ids).await?;

        match item::mark_summarized(pool, user_id, &ids).await {
            Ok(updated) if updated as usize != ids.len() => warn!(
                user_id = %user_id,
                "Marked {} of {} items summarized",
                updated,
                ids.len()
            ),
            Ok(_) => {}
            Err(e) => error!(
                user_id = %user_id,
                summary_id = %stored.id,
                error = %e,
                "Digest stored but items not marked summarized"
            ),
        }

        Ok(Some(UserDigest {
            user_id: user_id.to_string(),
            summary_id: stored.id,
            processed_count: ids.len(),
            summary_text: digest.summary_text,
            key_topics: digest.key_topics,
        }))
    }
}

/// One summarizer input line for an item.
///
/// Slack messages read `#channel Author: text`; saved links read
/// `[link] title (url)`.
pub fn format_item(item: &Item) -> String {
    let meta = item.meta();
    match item.source_type {
        SourceType::Slack => {
            let channel = meta
                .channel_name
                .as_deref()
                .or(meta.channel.as_deref())
                .unwrap_or("unknown");
            let author = meta
                .user_name
                .as_deref()
                .or(meta.user.as_deref())
                .unwrap_or("someone");
            format!("#{} {}: {}", channel, author, item.content)
        }
        SourceType::Web => {
            let title = meta.og_title.as_deref().unwrap_or(&item.content);
            match meta.url.as_deref() {
                Some(url) if url != title => format!("[link] {} ({})", title, url),
                _ => format!("[link] {}", title),
            }
        }
    }
}
