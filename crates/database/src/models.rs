//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A connected Slack workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Workspace {
    /// Slack team ID (unique).
    pub team_id: String,
    /// Bot or user access token for the Slack Web API.
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Display name of the team.
    pub team_name: Option<String>,
    /// Team icon URL.
    pub icon_url: Option<String>,
    /// Owning user.
    pub user_id: String,
}

impl Workspace {
    /// Whether this workspace has a credential the poller can use.
    pub fn has_credential(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

/// Where an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SourceType {
    /// A Slack message (polled or delivered by webhook).
    Slack,
    /// A user-saved web link.
    Web,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Slack => "slack",
            SourceType::Web => "web",
        }
    }
}

/// Lifecycle status of an item.
///
/// Items only move forward: `pending` to `summarized`, or to `done` /
/// `archived` through user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Summarized,
    Done,
    Archived,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::Pending,
        ItemStatus::Summarized,
        ItemStatus::Done,
        ItemStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Summarized => "summarized",
            ItemStatus::Done => "done",
            ItemStatus::Archived => "archived",
        }
    }

    /// Statuses the retention sweep may delete.
    pub fn is_processed(&self) -> bool {
        !matches!(self, ItemStatus::Pending)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ItemStatus::Pending),
            "summarized" => Ok(ItemStatus::Summarized),
            "done" => Ok(ItemStatus::Done),
            "archived" => Ok(ItemStatus::Archived),
            other => Err(format!("unknown item status: {}", other)),
        }
    }
}

/// Free-form item metadata, stored as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Slack author ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Resolved author display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Resolved author avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    /// Slack channel ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Slack channel name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    /// Slack message timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    /// Team ID of the workspace that produced the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_site_name: Option<String>,
    /// Ingestion path: "poll", "webhook" or "link".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_via: Option<String>,
}

/// A stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: String,
    pub source_type: SourceType,
    pub content: String,
    pub meta_data: Json<ItemMeta>,
    pub status: ItemStatus,
    pub created_at: String,
    pub user_id: String,
}

impl Item {
    pub fn meta(&self) -> &ItemMeta {
        &self.meta_data.0
    }
}

/// An item to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub source_type: SourceType,
    pub content: String,
    pub meta: ItemMeta,
    pub user_id: String,
}

/// A digest produced by one batch run for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Summary {
    pub id: String,
    pub summary_text: String,
    /// Contributing item IDs, in batch order.
    pub target_items: Json<Vec<String>>,
    pub created_at: String,
    pub user_id: String,
}

impl Summary {
    pub fn item_ids(&self) -> &[String] {
        &self.target_items.0
    }
}

/// Per-user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSettings {
    pub user_id: String,
    /// Words that mark an item as urgent.
    pub alert_keywords: Json<Vec<String>>,
    /// Slack user IDs whose messages are always urgent.
    pub vip_user_ids: Json<Vec<String>>,
    /// Extra summarization rule supplied by the user.
    pub report_custom_instructions: Option<String>,
    pub updated_at: String,
}

impl UserSettings {
    /// Create settings for a user with no keywords, VIPs or instructions.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }
}
