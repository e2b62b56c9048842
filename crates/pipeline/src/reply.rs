//! Drafting and sending replies to buffered Slack messages.

use std::sync::Arc;

use brain_core::{ReplyTone, Summarizer};
use database::{item, workspace, Database, Item, SourceType};
use slack_client::{PostMessageParams, PostMessageResponse, SlackApi};
use tracing::{info, warn};

use crate::error::{PipelineError, Result};

/// Drafts replies with the summarizer and posts them back to Slack.
#[derive(Clone)]
pub struct ReplyService {
    database: Database,
    slack: Arc<dyn SlackApi>,
    brain: Arc<dyn Summarizer>,
}

impl ReplyService {
    pub fn new(database: Database, slack: Arc<dyn SlackApi>, brain: Arc<dyn Summarizer>) -> Self {
        Self {
            database,
            slack,
            brain,
        }
    }

    /// Draft a reply to one of the user's items in the given tone.
    pub async fn draft(&self, user_id: &str, item_id: &str, tone: ReplyTone) -> Result<String> {
        let item = item::get_item(self.database.pool(), user_id, item_id).await?;
        Ok(self.brain.draft_reply(&item.content, tone).await?)
    }

    /// Post `text` to the channel the item came from, then mark the item done.
    ///
    /// The token is that of the workspace that produced the item, looked
    /// up within the user's own workspaces.
    pub async fn send(
        &self,
        user_id: &str,
        item_id: &str,
        text: &str,
        in_thread: bool,
    ) -> Result<PostMessageResponse> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::InvalidInput("reply text is empty".to_string()));
        }

        let pool = self.database.pool();
        let item = item::get_item(pool, user_id, item_id).await?;
        let (team, channel) = slack_origin(&item)?;

        let ws = match workspace::get_for_user(pool, user_id, team).await {
            Ok(ws) => ws,
            Err(e) if e.is_not_found() => {
                return Err(PipelineError::MissingCredential(team.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        if !ws.has_credential() {
            return Err(PipelineError::MissingCredential(ws.team_id));
        }

        let mut params = PostMessageParams::text(channel, text);
        if in_thread {
            if let Some(ts) = item.meta().ts.as_deref() {
                params = params.in_thread(ts);
            }
        }

        let posted = self.slack.post_message(&ws.access_token, params).await?;
        info!(user_id = %user_id, item_id = %item_id, channel = %channel, "Reply posted");

        if let Err(e) = item::mark_done(pool, user_id, std::slice::from_ref(&item.id)).await {
            warn!(item_id = %item_id, error = %e, "Reply posted but item not marked done");
        }

        Ok(posted)
    }
}

fn slack_origin(item: &Item) -> Result<(&str, &str)> {
    if item.source_type != SourceType::Slack {
        return Err(PipelineError::InvalidInput(format!(
            "item {} is not a Slack message",
            item.id
        )));
    }
    let meta = item.meta();
    match (meta.team.as_deref(), meta.channel.as_deref()) {
        (Some(team), Some(channel)) => Ok((team, channel)),
        _ => Err(PipelineError::InvalidInput(format!(
            "item {} has no workspace or channel",
            item.id
        ))),
    }
}
