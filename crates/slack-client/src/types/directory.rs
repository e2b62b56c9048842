//! Workspace member directory types (`users.list`).

use serde::Deserialize;

use super::ResponseMetadata;

/// User ID of Slack's built-in bot.
pub const SLACKBOT_USER_ID: &str = "USLACKBOT";

/// A workspace member as returned by `users.list`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub profile: SlackUserProfile,
}

/// Profile fields used for display.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackUserProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub image_48: Option<String>,
    #[serde(default)]
    pub image_72: Option<String>,
}

impl SlackUser {
    /// Best human-readable name: display name, then real name, then handle, then ID.
    pub fn display_name(&self) -> &str {
        [
            self.profile.display_name.as_deref(),
            self.profile.real_name.as_deref(),
            self.real_name.as_deref(),
            self.name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(&self.id)
    }

    /// Avatar URL, preferring the larger image.
    pub fn avatar(&self) -> Option<&str> {
        self.profile
            .image_72
            .as_deref()
            .or(self.profile.image_48.as_deref())
    }

    /// Whether this member is an automated account.
    pub fn is_automated(&self) -> bool {
        self.is_bot || self.id == SLACKBOT_USER_ID
    }
}

/// Raw `users.list` response.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersListResponse {
    #[serde(default)]
    pub members: Vec<SlackUser>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}
