//! The Slack operations the buffer depends on.

use async_trait::async_trait;

use crate::error::SlackError;
use crate::types::{
    Page, PostMessageParams, PostMessageResponse, SlackChannel, SlackMessage, SlackUser,
};

/// Slack Web API surface used by polling and replies.
///
/// Every call takes the workspace's bot token explicitly, so one
/// implementation serves all connected workspaces. Rate limiting is
/// reported as [`SlackError::RateLimited`] and never retried here.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// One page of `users.list`.
    async fn list_users(
        &self,
        token: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SlackUser>, SlackError>;

    /// One page of non-archived conversations of every kind.
    async fn list_channels(
        &self,
        token: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SlackChannel>, SlackError>;

    /// One page of messages in `channel` newer than the Slack timestamp
    /// `oldest`, newest first.
    async fn channel_history(
        &self,
        token: &str,
        channel: &str,
        oldest: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SlackMessage>, SlackError>;

    /// Post a message.
    async fn post_message(
        &self,
        token: &str,
        params: PostMessageParams,
    ) -> Result<PostMessageResponse, SlackError>;
}
