//! Types for the Slack Web API.

mod conversation;
mod directory;
mod send;

pub use conversation::{HistoryResponse, ListChannelsResponse, SlackChannel, SlackMessage};
pub use directory::{SlackUser, SlackUserProfile, UsersListResponse, SLACKBOT_USER_ID};
pub use send::{PostMessageParams, PostMessageResponse};

use serde::Deserialize;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Cursor for the next page. `None` when this was the last page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Build a page, treating an empty cursor as the end of the listing.
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.filter(|cursor| !cursor.is_empty()),
        }
    }

    /// Whether more pages follow.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Envelope fields shared by every Web API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}
