//! Slack Web API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::SlackApi;
use crate::config::SlackConfig;
use crate::error::SlackError;
use crate::types::{
    ApiEnvelope, HistoryResponse, ListChannelsResponse, Page, PostMessageParams,
    PostMessageResponse, SlackChannel, SlackMessage, SlackUser, UsersListResponse,
};

/// Conversation kinds polled for new messages.
pub const CONVERSATION_TYPES: &str = "public_channel,private_channel,mpim,im";

/// Client for the Slack Web API.
#[derive(Clone)]
pub struct SlackClient {
    http: Client,
    config: SlackConfig,
}

impl SlackClient {
    /// Create a client with the given configuration.
    pub fn new(config: SlackConfig) -> Result<Self, SlackError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SlackError::Http)?;
        Ok(Self { http, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, SlackError> {
        Self::new(SlackConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &SlackConfig {
        &self.config
    }

    fn get(&self, method: &str, token: &str) -> RequestBuilder {
        self.http
            .get(self.config.method_url(method))
            .bearer_auth(token)
    }

    fn post(&self, method: &str, token: &str) -> RequestBuilder {
        self.http
            .post(self.config.method_url(method))
            .bearer_auth(token)
    }

    /// Send a request and decode a successful Web API response.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        token: &str,
        request: RequestBuilder,
    ) -> Result<T, SlackError> {
        if token.trim().is_empty() {
            return Err(SlackError::Config(format!("no token for {}", method)));
        }

        debug!("Slack call: {}", method);
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(response.headers());
            warn!("Slack rate limited {} (retry after {:?})", method, retry_after);
            return Err(SlackError::RateLimited {
                method: method.to_string(),
                retry_after,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Status {
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let envelope: ApiEnvelope = serde_json::from_value(body.clone())?;
        if !envelope.ok {
            let error = envelope.error.unwrap_or_else(|| "unknown_error".to_string());
            if error == "ratelimited" {
                return Err(SlackError::RateLimited {
                    method: method.to_string(),
                    retry_after: None,
                });
            }
            return Err(SlackError::Api {
                method: method.to_string(),
                error,
            });
        }

        Ok(serde_json::from_value(body)?)
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn page_query(limit: u32, cursor: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![("limit", limit.to_string())];
    if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
        query.push(("cursor", cursor.to_string()));
    }
    query
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn list_users(
        &self,
        token: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SlackUser>, SlackError> {
        let request = self
            .get("users.list", token)
            .query(&page_query(self.config.page_limit, cursor));
        let response: UsersListResponse = self.call("users.list", token, request).await?;
        Ok(Page::new(
            response.members,
            response.response_metadata.and_then(|m| m.next_cursor),
        ))
    }

    async fn list_channels(
        &self,
        token: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SlackChannel>, SlackError> {
        let mut query = page_query(self.config.page_limit, cursor);
        query.push(("types", CONVERSATION_TYPES.to_string()));
        query.push(("exclude_archived", "true".to_string()));

        let request = self.get("conversations.list", token).query(&query);
        let response: ListChannelsResponse =
            self.call("conversations.list", token, request).await?;
        Ok(Page::new(
            response.channels,
            response.response_metadata.and_then(|m| m.next_cursor),
        ))
    }

    async fn channel_history(
        &self,
        token: &str,
        channel: &str,
        oldest: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SlackMessage>, SlackError> {
        let mut query = page_query(self.config.page_limit, cursor);
        query.push(("channel", channel.to_string()));
        query.push(("oldest", oldest.to_string()));

        let request = self.get("conversations.history", token).query(&query);
        let response: HistoryResponse =
            self.call("conversations.history", token, request).await?;
        let next_cursor = if response.has_more {
            response.response_metadata.and_then(|m| m.next_cursor)
        } else {
            None
        };
        Ok(Page::new(response.messages, next_cursor))
    }

    async fn post_message(
        &self,
        token: &str,
        params: PostMessageParams,
    ) -> Result<PostMessageResponse, SlackError> {
        let request = self.post("chat.postMessage", token).json(&params);
        self.call("chat.postMessage", token, request).await
    }
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_url", &self.config.api_url)
            .finish()
    }
}
