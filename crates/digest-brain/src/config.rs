//! Configuration for DigestBrain.

use std::env;

/// Default chat completions base URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for DigestBrain.
#[derive(Debug, Clone)]
pub struct DigestBrainConfig {
    /// Base URL of an OpenAI-compatible API.
    pub api_url: String,

    /// API key for authentication. Empty means every call fails closed.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// HTTP timeout for a single request, in seconds.
    pub timeout_secs: u64,
}

impl Default for DigestBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: Some(2048),
            temperature: Some(0.3),
            timeout_secs: 60,
        }
    }
}

impl DigestBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Environment variables:
    /// - `LLM_API_KEY` - API key (a missing key is not an error here; calls fail instead)
    /// - `LLM_API_URL` - API URL (default: https://api.openai.com)
    /// - `LLM_MODEL` - Model name (default: gpt-4o-mini)
    /// - `LLM_MAX_TOKENS` - Max tokens (default: 2048)
    /// - `LLM_TEMPERATURE` - Temperature (default: 0.3)
    /// - `LLM_TIMEOUT_SECS` - Request timeout (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = env::var("LLM_API_KEY").unwrap_or_default();

        let api_url = env::var("LLM_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let model = env::var("LLM_MODEL").unwrap_or(defaults.model);

        let max_tokens = env::var("LLM_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("LLM_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            api_url,
            api_key,
            model,
            max_tokens,
            temperature,
            timeout_secs,
        }
    }

    /// Whether an API key is configured.
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Create a new config builder.
    pub fn builder() -> DigestBrainConfigBuilder {
        DigestBrainConfigBuilder::default()
    }
}

/// Builder for DigestBrainConfig.
#[derive(Debug, Default)]
pub struct DigestBrainConfigBuilder {
    config: DigestBrainConfig,
}

impl DigestBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the request timeout.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DigestBrainConfig {
        self.config
    }
}
