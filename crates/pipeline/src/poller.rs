//! Slack source poller and webhook ingestion.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use database::{item, workspace, Database, ItemMeta, NewItem, SourceType, Workspace};
use serde::Deserialize;
use slack_client::{SlackApi, SlackChannel, SlackMessage};
use tracing::{debug, info, warn};

use crate::directory::{pause, UserDirectory};
use crate::error::{PipelineError, Result};
use crate::settings::PipelineSettings;

/// `created_via` value for polled messages.
pub const VIA_POLL: &str = "poll";
/// `created_via` value for webhook-delivered messages.
pub const VIA_WEBHOOK: &str = "webhook";

/// Counters from one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    pub workspaces_polled: usize,
    pub workspaces_failed: usize,
    pub channels_scanned: usize,
    pub channels_skipped: usize,
    pub messages_inserted: usize,
    pub messages_filtered: usize,
    pub messages_duplicate: usize,
}

impl PollReport {
    fn absorb(&mut self, other: PollReport) {
        self.channels_scanned += other.channels_scanned;
        self.channels_skipped += other.channels_skipped;
        self.messages_inserted += other.messages_inserted;
        self.messages_filtered += other.messages_filtered;
        self.messages_duplicate += other.messages_duplicate;
    }

    fn count(&mut self, outcome: &Ingested) {
        match outcome {
            Ingested::Inserted(_) => self.messages_inserted += 1,
            Ingested::Duplicate => self.messages_duplicate += 1,
            Ingested::Filtered => self.messages_filtered += 1,
        }
    }
}

/// A single message delivered by the Slack Events API.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEvent {
    /// Team ID of the workspace.
    pub team: String,
    pub channel: String,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(flatten)]
    pub message: SlackMessage,
}

/// Outcome of offering one message to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingested {
    Inserted(String),
    Duplicate,
    Filtered,
}

/// Pulls recent messages from every connected workspace into the buffer.
#[derive(Clone)]
pub struct SourcePoller {
    database: Database,
    slack: Arc<dyn SlackApi>,
    settings: PipelineSettings,
}

impl SourcePoller {
    pub fn new(database: Database, slack: Arc<dyn SlackApi>, settings: PipelineSettings) -> Self {
        Self {
            database,
            slack,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Poll every workspace that has a credential.
    ///
    /// Failures inside one workspace are logged and that workspace is
    /// skipped. A closed store stops the poll immediately.
    pub async fn poll(&self) -> Result<PollReport> {
        self.ensure_store()?;

        let workspaces = workspace::list_pollable(self.database.pool()).await?;
        let oldest = oldest_ts(Utc::now(), self.settings.lookback);
        let mut report = PollReport::default();

        info!(
            "Polling {} workspaces for messages since {}",
            workspaces.len(),
            oldest
        );

        for ws in &workspaces {
            self.ensure_store()?;

            match self.poll_workspace(ws, &oldest).await {
                Ok(stats) => {
                    report.workspaces_polled += 1;
                    report.absorb(stats);
                }
                Err(e) if e.is_store_unavailable() || self.database.is_closed() => {
                    warn!(team_id = %ws.team_id, "Store became unavailable; aborting poll");
                    return Err(PipelineError::StoreUnavailable);
                }
                Err(e) => {
                    report.workspaces_failed += 1;
                    warn!(team_id = %ws.team_id, error = %e, "Workspace poll failed; skipping");
                }
            }
        }

        info!(
            "Poll complete: {} workspaces ({} failed), {} channels, {} new messages",
            report.workspaces_polled,
            report.workspaces_failed,
            report.channels_scanned,
            report.messages_inserted
        );
        Ok(report)
    }

    async fn poll_workspace(&self, ws: &Workspace, oldest: &str) -> Result<PollReport> {
        let token = ws.access_token.as_str();
        let directory = UserDirectory::fetch(self.slack.as_ref(), token, &self.settings).await?;
        let channels = self.collect_channels(ws).await?;
        let mut stats = PollReport::default();

        debug!(
            team_id = %ws.team_id,
            "Scanning {} channels with {} known members",
            channels.len(),
            directory.len()
        );

        for (index, channel) in channels.iter().filter(|c| !c.is_archived).enumerate() {
            if index > 0 {
                pause(self.settings.channel_delay).await;
            }

            let Some(messages) = self.collect_history(ws, channel, oldest).await? else {
                stats.channels_skipped += 1;
                continue;
            };

            stats.channels_scanned += 1;
            let channel_name = channel.label();
            for message in &messages {
                let outcome = self
                    .offer(ws, &channel.id, &channel_name, message, &directory, VIA_POLL)
                    .await?;
                stats.count(&outcome);
            }
        }

        Ok(stats)
    }

    /// Page through a channel's history inside the lookback window.
    ///
    /// A rate limit waits once, then stops paging. `None` means the first
    /// page was rate limited and the channel is skipped.
    async fn collect_history(
        &self,
        ws: &Workspace,
        channel: &SlackChannel,
        oldest: &str,
    ) -> Result<Option<Vec<SlackMessage>>> {
        let token = ws.access_token.as_str();
        let mut messages = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            match self
                .slack
                .channel_history(token, &channel.id, oldest, cursor.as_deref())
                .await
            {
                Ok(page) => {
                    pages += 1;
                    messages.extend(page.items);
                    match page.next_cursor {
                        Some(next) => cursor = Some(next),
                        None => break,
                    }
                }
                Err(e) if e.is_rate_limited() => {
                    let wait = self.settings.rate_limit_wait(e.retry_after());
                    warn!(
                        team_id = %ws.team_id,
                        channel = %channel.id,
                        "History rate limited after {} pages; waiting {:?}",
                        pages,
                        wait
                    );
                    pause(wait).await;
                    if pages == 0 {
                        return Ok(None);
                    }
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        if pages > 1 {
            debug!(
                team_id = %ws.team_id,
                channel = %channel.id,
                "Read {} history pages ({} messages)",
                pages,
                messages.len()
            );
        }
        Ok(Some(messages))
    }

    /// Page through the workspace's conversations.
    ///
    /// A rate limit waits once, then stops paging. Channels already
    /// collected are still scanned.
    async fn collect_channels(&self, ws: &Workspace) -> Result<Vec<SlackChannel>> {
        let mut channels = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            match self
                .slack
                .list_channels(&ws.access_token, cursor.as_deref())
                .await
            {
                Ok(page) => {
                    channels.extend(page.items);
                    match page.next_cursor {
                        Some(next) => cursor = Some(next),
                        None => break,
                    }
                }
                Err(e) if e.is_rate_limited() => {
                    let wait = self.settings.rate_limit_wait(e.retry_after());
                    warn!(
                        team_id = %ws.team_id,
                        "conversations.list rate limited; waiting {:?} and keeping {} channels",
                        wait,
                        channels.len()
                    );
                    pause(wait).await;
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(channels)
    }

    /// Buffer one webhook-delivered message.
    ///
    /// The event goes through the same filtering, name resolution and
    /// dedup as polled messages. A directory fetch failure falls back to
    /// raw IDs instead of dropping the message.
    pub async fn ingest_event(&self, event: &InboundEvent) -> Result<Ingested> {
        self.ensure_store()?;

        let ws = workspace::get_by_team(self.database.pool(), &event.team).await?;
        if !passes_filter(&event.message, &UserDirectory::default()) {
            return Ok(Ingested::Filtered);
        }
        // Slack redelivers events; skip the directory fetch for known messages.
        if item::exists_by_source(
            self.database.pool(),
            &ws.team_id,
            &event.channel,
            &event.message.ts,
        )
        .await?
        {
            return Ok(Ingested::Duplicate);
        }

        let directory = if ws.has_credential() {
            match UserDirectory::fetch(self.slack.as_ref(), &ws.access_token, &self.settings).await
            {
                Ok(directory) => directory,
                Err(e) => {
                    warn!(
                        team_id = %ws.team_id,
                        error = %e,
                        "Directory fetch failed; using raw IDs"
                    );
                    UserDirectory::default()
                }
            }
        } else {
            UserDirectory::default()
        };

        let channel_name = event
            .channel_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| event.channel.clone());

        self.offer(
            &ws,
            &event.channel,
            &channel_name,
            &event.message,
            &directory,
            VIA_WEBHOOK,
        )
        .await
    }

    async fn offer(
        &self,
        ws: &Workspace,
        channel_id: &str,
        channel_name: &str,
        message: &SlackMessage,
        directory: &UserDirectory,
        created_via: &str,
    ) -> Result<Ingested> {
        if !passes_filter(message, directory) {
            return Ok(Ingested::Filtered);
        }
        let Some(author) = message.user.as_deref() else {
            return Ok(Ingested::Filtered);
        };

        let new_item = NewItem {
            source_type: SourceType::Slack,
            content: message.text.clone(),
            meta: ItemMeta {
                user: Some(author.to_string()),
                user_name: Some(directory.name_of(author).to_string()),
                user_avatar: directory.avatar_of(author).map(str::to_string),
                channel: Some(channel_id.to_string()),
                channel_name: Some(channel_name.to_string()),
                ts: Some(message.ts.clone()),
                team: Some(ws.team_id.clone()),
                created_via: Some(created_via.to_string()),
                ..ItemMeta::default()
            },
            user_id: ws.user_id.clone(),
        };

        match item::insert_if_absent(self.database.pool(), &new_item).await? {
            Some(id) => Ok(Ingested::Inserted(id)),
            None => Ok(Ingested::Duplicate),
        }
    }

    fn ensure_store(&self) -> Result<()> {
        if self.database.is_closed() {
            return Err(PipelineError::StoreUnavailable);
        }
        Ok(())
    }
}

/// Human messages only: no subtype, an author, and not a bot either by
/// directory flag or inline `bot_id`.
pub fn passes_filter(message: &SlackMessage, directory: &UserDirectory) -> bool {
    if !message.is_plain_user_message() {
        return false;
    }
    match message.user.as_deref() {
        Some(user) => !directory.is_bot(user),
        None => false,
    }
}

/// Slack timestamp `lookback` before `now`.
pub fn oldest_ts(now: DateTime<Utc>, lookback: Duration) -> String {
    let lookback = i64::try_from(lookback.as_secs()).unwrap_or(i64::MAX);
    let oldest = now.timestamp().saturating_sub(lookback).max(0);
    format!("{}.000000", oldest)
}
