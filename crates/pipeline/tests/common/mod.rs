//! Shared fixtures: an in-memory database and a scripted Slack workspace.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use database::{workspace, Database, Workspace};
use pipeline::{PipelineSettings, SourcePoller};
use slack_client::{
    Page, PostMessageParams, PostMessageResponse, SlackApi, SlackChannel, SlackError,
    SlackMessage, SlackUser,
};

/// Route pipeline logs to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn test_db() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    db
}

pub async fn add_workspace(db: &Database, team_id: &str, token: &str, owner: &str) {
    let ws = Workspace {
        team_id: team_id.to_string(),
        access_token: token.to_string(),
        team_name: Some(format!("Team {}", team_id)),
        icon_url: None,
        user_id: owner.to_string(),
    };
    workspace::upsert_workspace(db.pool(), &ws).await.unwrap();
}

/// Slack timestamp `secs_ago` seconds before now, with a unique suffix.
pub fn recent_ts(secs_ago: u64, seq: u32) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    format!("{}.{:06}", now - secs_ago, seq)
}

pub fn user(id: &str, name: &str) -> SlackUser {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "profile": { "display_name": name, "image_72": format!("https://avatars/{}.png", id) }
    }))
    .unwrap()
}

pub fn bot_user(id: &str) -> SlackUser {
    serde_json::from_value(serde_json::json!({ "id": id, "name": "bot", "is_bot": true })).unwrap()
}

pub fn channel(id: &str, name: &str) -> SlackChannel {
    serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
}

pub fn message(author: &str, text: &str, ts: &str) -> SlackMessage {
    serde_json::from_value(serde_json::json!({
        "type": "message", "user": author, "text": text, "ts": ts
    }))
    .unwrap()
}

pub fn poller(db: &Database, slack: Arc<FakeSlack>) -> SourcePoller {
    SourcePoller::new(db.clone(), slack, PipelineSettings::without_delays())
}

#[derive(Default)]
struct TeamState {
    users: Vec<SlackUser>,
    channel_pages: Vec<Vec<SlackChannel>>,
    history: HashMap<String, Vec<SlackMessage>>,
}

#[derive(Default)]
struct FakeState {
    teams: HashMap<String, TeamState>,
    rate_limited_pages: HashMap<String, usize>,
    rate_limited_channels: HashSet<String>,
    rate_limited_history_pages: HashMap<String, usize>,
    history_page_size: Option<usize>,
    revoked_tokens: HashSet<String>,
    history_calls: Vec<String>,
    users_calls: usize,
    posted: Vec<(String, PostMessageParams)>,
}

/// In-memory Slack keyed by token.
#[derive(Default)]
pub struct FakeSlack {
    state: Mutex<FakeState>,
}

impl FakeSlack {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_users(&self, token: &str, users: Vec<SlackUser>) {
        let mut state = self.state.lock().unwrap();
        state.teams.entry(token.to_string()).or_default().users.extend(users);
    }

    /// Add a page of channels; pages are served in insertion order.
    pub fn add_channel_page(&self, token: &str, channels: Vec<SlackChannel>) {
        let mut state = self.state.lock().unwrap();
        state
            .teams
            .entry(token.to_string())
            .or_default()
            .channel_pages
            .push(channels);
    }

    pub fn add_messages(&self, token: &str, channel: &str, messages: Vec<SlackMessage>) {
        let mut state = self.state.lock().unwrap();
        state
            .teams
            .entry(token.to_string())
            .or_default()
            .history
            .entry(channel.to_string())
            .or_default()
            .extend(messages);
    }

    /// Answer 429 when the given channel page is requested.
    pub fn rate_limit_channel_page(&self, token: &str, page: usize) {
        let mut state = self.state.lock().unwrap();
        state.rate_limited_pages.insert(token.to_string(), page);
    }

    /// Answer 429 for every history request on this channel.
    pub fn rate_limit_history(&self, channel: &str) {
        let mut state = self.state.lock().unwrap();
        state.rate_limited_channels.insert(channel.to_string());
    }

    /// Serve channel history in pages of `size` messages, in the order
    /// they were added.
    pub fn page_history(&self, size: usize) {
        let mut state = self.state.lock().unwrap();
        state.history_page_size = Some(size.max(1));
    }

    /// Answer 429 when the given history page of this channel is requested.
    pub fn rate_limit_history_page(&self, channel: &str, page: usize) {
        let mut state = self.state.lock().unwrap();
        state
            .rate_limited_history_pages
            .insert(channel.to_string(), page);
    }

    /// Answer `invalid_auth` for every call made with this token.
    pub fn revoke(&self, token: &str) {
        let mut state = self.state.lock().unwrap();
        state.revoked_tokens.insert(token.to_string());
    }

    pub fn history_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().history_calls.clone()
    }

    pub fn users_calls(&self) -> usize {
        self.state.lock().unwrap().users_calls
    }

    pub fn posted(&self) -> Vec<(String, PostMessageParams)> {
        self.state.lock().unwrap().posted.clone()
    }

    fn check_token(state: &FakeState, method: &str, token: &str) -> Result<(), SlackError> {
        if state.revoked_tokens.contains(token) {
            return Err(SlackError::Api {
                method: method.to_string(),
                error: "invalid_auth".to_string(),
            });
        }
        Ok(())
    }
}

fn rate_limited(method: &str) -> SlackError {
    SlackError::RateLimited {
        method: method.to_string(),
        retry_after: Some(Duration::ZERO),
    }
}

#[async_trait]
impl SlackApi for FakeSlack {
    async fn list_users(
        &self,
        token: &str,
        _cursor: Option<&str>,
    ) -> Result<Page<SlackUser>, SlackError> {
        let mut state = self.state.lock().unwrap();
        Self::check_token(&state, "users.list", token)?;
        state.users_calls += 1;
        let users = state
            .teams
            .get(token)
            .map(|team| team.users.clone())
            .unwrap_or_default();
        Ok(Page::new(users, None))
    }

    async fn list_channels(
        &self,
        token: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SlackChannel>, SlackError> {
        let state = self.state.lock().unwrap();
        Self::check_token(&state, "conversations.list", token)?;

        let index: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        if state.rate_limited_pages.get(token) == Some(&index) {
            return Err(rate_limited("conversations.list"));
        }

        let pages = state
            .teams
            .get(token)
            .map(|team| team.channel_pages.clone())
            .unwrap_or_default();
        let items = pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < pages.len()).then(|| (index + 1).to_string());
        Ok(Page::new(items, next))
    }

    async fn channel_history(
        &self,
        token: &str,
        channel: &str,
        oldest: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SlackMessage>, SlackError> {
        let mut state = self.state.lock().unwrap();
        Self::check_token(&state, "conversations.history", token)?;
        state.history_calls.push(channel.to_string());

        if state.rate_limited_channels.contains(channel) {
            return Err(rate_limited("conversations.history"));
        }

        let index: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        if state.rate_limited_history_pages.get(channel) == Some(&index) {
            return Err(rate_limited("conversations.history"));
        }

        let oldest: f64 = oldest.parse().unwrap_or(0.0);
        let messages: Vec<SlackMessage> = state
            .teams
            .get(token)
            .and_then(|team| team.history.get(channel))
            .map(|messages| {
                messages
                    .iter()
                    .filter(|m| m.ts.parse::<f64>().unwrap_or(0.0) > oldest)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let Some(size) = state.history_page_size else {
            return Ok(Page::new(messages, None));
        };
        let items: Vec<SlackMessage> = messages
            .iter()
            .skip(index * size)
            .take(size)
            .cloned()
            .collect();
        let next = ((index + 1) * size < messages.len()).then(|| (index + 1).to_string());
        Ok(Page::new(items, next))
    }

    async fn post_message(
        &self,
        token: &str,
        params: PostMessageParams,
    ) -> Result<PostMessageResponse, SlackError> {
        let mut state = self.state.lock().unwrap();
        Self::check_token(&state, "chat.postMessage", token)?;
        let response = PostMessageResponse {
            channel: params.channel.clone(),
            ts: recent_ts(0, state.posted.len() as u32 + 1),
        };
        state.posted.push((token.to_string(), params));
        Ok(response)
    }
}
