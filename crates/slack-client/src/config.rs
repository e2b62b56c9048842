//! Configuration types for slack-client.

use std::env;
use std::time::Duration;

/// Default Slack Web API base URL.
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Configuration for the Slack Web API client.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Base URL of the Web API (e.g., "https://slack.com/api").
    pub api_url: String,
    /// Transport timeout for a single request.
    pub timeout: Duration,
    /// Page size requested from paginated endpoints.
    pub page_limit: u32,
}

impl SlackConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SLACK_API_URL` | Web API base URL | `https://slack.com/api` |
    /// | `SLACK_TIMEOUT_SECS` | Request timeout | `30` |
    pub fn from_env() -> Self {
        let mut config = match env::var("SLACK_API_URL") {
            Ok(url) => Self::new(url),
            Err(_) => Self::default(),
        };
        if let Some(secs) = env::var("SLACK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Get the URL of a Web API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_url, method)
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            page_limit: 200,
        }
    }
}
