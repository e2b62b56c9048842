//! Conversation types (`conversations.list`, `conversations.history`).

use serde::Deserialize;

use super::ResponseMetadata;

/// A conversation the token can see: channel, private channel, DM or group DM.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackChannel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_im: bool,
    #[serde(default)]
    pub is_mpim: bool,
    /// Counterpart user of a direct message.
    #[serde(default)]
    pub user: Option<String>,
}

impl SlackChannel {
    /// Label stored alongside buffered messages.
    ///
    /// Named channels use their name; DMs fall back to the counterpart's ID
    /// and anything else to the channel ID.
    pub fn label(&self) -> String {
        match (&self.name, &self.user) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(user)) if self.is_im => format!("dm-{}", user),
            _ => self.id.clone(),
        }
    }
}

/// A message from `conversations.history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackMessage {
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    /// Present on joins, edits, bot posts and other non-plain messages.
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub text: String,
    pub ts: String,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

impl SlackMessage {
    /// Plain human message: no subtype, has an author, not posted by an app.
    pub fn is_plain_user_message(&self) -> bool {
        self.subtype.is_none() && self.user.is_some() && self.bot_id.is_none()
    }
}

/// Raw `conversations.list` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ListChannelsResponse {
    #[serde(default)]
    pub channels: Vec<SlackChannel>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// Raw `conversations.history` response.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<SlackMessage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}
