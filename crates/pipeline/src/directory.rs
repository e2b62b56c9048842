//! Per-workspace member lookup used to label messages.

use std::collections::HashMap;
use std::time::Duration;

use slack_client::{SlackApi, SlackUser};
use tracing::{debug, warn};

use crate::error::Result;
use crate::settings::PipelineSettings;

/// A resolved message author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub avatar: Option<String>,
    pub is_bot: bool,
}

impl From<&SlackUser> for Member {
    fn from(user: &SlackUser) -> Self {
        Self {
            name: user.display_name().to_string(),
            avatar: user.avatar().map(str::to_string),
            is_bot: user.is_automated(),
        }
    }
}

/// Map of user ID to member, built fresh for one workspace and one poll.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    members: HashMap<String, Member>,
}

impl UserDirectory {
    /// Fetch every page of `users.list`.
    ///
    /// A rate limit waits once and keeps the members collected so far.
    pub async fn fetch(
        slack: &dyn SlackApi,
        token: &str,
        settings: &PipelineSettings,
    ) -> Result<Self> {
        let mut directory = Self::default();
        let mut cursor: Option<String> = None;

        loop {
            match slack.list_users(token, cursor.as_deref()).await {
                Ok(page) => {
                    directory.extend(&page.items);
                    match page.next_cursor {
                        Some(next) => cursor = Some(next),
                        None => break,
                    }
                }
                Err(e) if e.is_rate_limited() => {
                    let wait = settings.rate_limit_wait(e.retry_after());
                    warn!(
                        "users.list rate limited; waiting {:?} and keeping {} members",
                        wait,
                        directory.len()
                    );
                    pause(wait).await;
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!("Directory built with {} members", directory.len());
        Ok(directory)
    }

    /// Add or replace members.
    pub fn extend(&mut self, users: &[SlackUser]) {
        for user in users {
            self.members.insert(user.id.clone(), Member::from(user));
        }
    }

    pub fn get(&self, user_id: &str) -> Option<&Member> {
        self.members.get(user_id)
    }

    /// Whether the directory flags this user as a bot.
    pub fn is_bot(&self, user_id: &str) -> bool {
        self.get(user_id).is_some_and(|m| m.is_bot)
    }

    /// Display name, falling back to the raw ID.
    pub fn name_of<'a>(&'a self, user_id: &'a str) -> &'a str {
        self.get(user_id).map(|m| m.name.as_str()).unwrap_or(user_id)
    }

    pub fn avatar_of(&self, user_id: &str) -> Option<&str> {
        self.get(user_id).and_then(|m| m.avatar.as_deref())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

pub(crate) async fn pause(wait: Duration) {
    if !wait.is_zero() {
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(json: &str) -> SlackUser {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_lookup_and_fallback() {
        let mut directory = UserDirectory::default();
        directory.extend(&[
            user(r#"{"id": "U1", "profile": {"display_name": "Alice", "image_72": "https://img/a.png"}}"#),
            user(r#"{"id": "B1", "name": "deploybot", "is_bot": true}"#),
        ]);

        assert_eq!(directory.name_of("U1"), "Alice");
        assert_eq!(directory.avatar_of("U1"), Some("https://img/a.png"));
        assert_eq!(directory.name_of("U404"), "U404");
        assert!(directory.is_bot("B1"));
        assert!(!directory.is_bot("U1"));
        assert!(!directory.is_bot("U404"));
    }
}
