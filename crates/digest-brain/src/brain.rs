//! DigestBrain implementation using a chat completions API.

use std::time::Duration;

use brain_core::{
    answer_system_prompt, async_trait, hash_prompt, parse_digest, reply_system_prompt,
    require_text, summary_system_prompt, summary_user_prompt, BrainError, Digest, ReplyTone,
    Summarizer, SUMMARY_RULES,
};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat,
};
use crate::config::DigestBrainConfig;

/// A [`Summarizer`] backed by an OpenAI-compatible chat completions API.
///
/// The brain holds no per-user state. A missing API key does not prevent
/// construction, but every call then fails with
/// [`BrainError::Configuration`] before any request is sent.
pub struct DigestBrain {
    client: Client,
    config: DigestBrainConfig,
}

impl DigestBrain {
    /// Create a new DigestBrain with the given configuration.
    pub fn new(config: DigestBrainConfig) -> Result<Self, BrainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                BrainError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "DigestBrain initialized with model: {}, rules fingerprint: {}",
            config.model,
            hash_prompt(SUMMARY_RULES)
        );
        if !config.has_credential() {
            warn!("LLM_API_KEY is not set; summarization calls will fail");
        }

        Ok(Self { client, config })
    }

    /// Create a DigestBrain from environment variables.
    ///
    /// See [`DigestBrainConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(DigestBrainConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &DigestBrainConfig {
        &self.config
    }

    /// Make a chat completion request and return the first choice's content.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        response_format: Option<ResponseFormat>,
    ) -> Result<String, BrainError> {
        if !self.config.has_credential() {
            return Err(BrainError::Configuration("LLM_API_KEY not set".to_string()));
        }

        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            response_format,
        };

        debug!("Sending chat completion request with {} messages", request.messages.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(BrainError::ProcessingFailed(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BrainError::InvalidResponse("no choices in response".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            warn!("Completion stopped at the token limit");
        }

        choice
            .message
            .content
            .ok_or_else(|| BrainError::InvalidResponse("no content in response".to_string()))
    }
}

#[async_trait]
impl Summarizer for DigestBrain {
    async fn summarize(
        &self,
        messages: &[String],
        custom_instructions: Option<&str>,
    ) -> Result<Digest, BrainError> {
        let request = vec![
            ChatMessage::system(summary_system_prompt(custom_instructions)),
            ChatMessage::user(summary_user_prompt(messages)),
        ];

        let content = self
            .chat_completion(request, Some(ResponseFormat::json_object()))
            .await?;

        parse_digest(&content)
    }

    async fn draft_reply(
        &self,
        original_message: &str,
        tone: ReplyTone,
    ) -> Result<String, BrainError> {
        let request = vec![
            ChatMessage::system(reply_system_prompt(tone)),
            ChatMessage::user(original_message),
        ];

        let content = self.chat_completion(request, None).await?;
        require_text(&content)
    }

    async fn answer_question(
        &self,
        summary_context: &str,
        question: &str,
    ) -> Result<String, BrainError> {
        let request = vec![
            ChatMessage::system(answer_system_prompt(summary_context)),
            ChatMessage::user(question),
        ];

        let content = self.chat_completion(request, None).await?;
        require_text(&content)
    }

    fn name(&self) -> &str {
        "DigestBrain"
    }
}
