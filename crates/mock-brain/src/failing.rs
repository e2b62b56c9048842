//! Failing summarizer - returns errors for testing failure isolation.

use async_trait::async_trait;
use brain_core::{BrainError, Digest, ReplyTone, Summarizer};

use crate::echo::EchoSummarizer;

/// A summarizer that fails, either always or only for matching input.
///
/// With a marker, calls whose messages contain the marker fail with
/// [`BrainError::InvalidResponse`] and all other calls echo like
/// [`EchoSummarizer`].
#[derive(Debug, Default)]
pub struct FailingSummarizer {
    marker: Option<String>,
    fallback: EchoSummarizer,
}

impl FailingSummarizer {
    /// Fail every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail only calls where some message contains `marker`.
    pub fn when_contains(marker: impl Into<String>) -> Self {
        Self {
            marker: Some(marker.into()),
            fallback: EchoSummarizer::new(),
        }
    }

    fn should_fail(&self, texts: &[&str]) -> bool {
        match &self.marker {
            Some(marker) => texts.iter().any(|text| text.contains(marker.as_str())),
            None => true,
        }
    }

    fn error() -> BrainError {
        BrainError::InvalidResponse("malformed model output".to_string())
    }
}

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(
        &self,
        messages: &[String],
        custom_instructions: Option<&str>,
    ) -> Result<Digest, BrainError> {
        let texts: Vec<&str> = messages.iter().map(String::as_str).collect();
        if self.should_fail(&texts) {
            return Err(Self::error());
        }
        self.fallback.summarize(messages, custom_instructions).await
    }

    async fn draft_reply(
        &self,
        original_message: &str,
        tone: ReplyTone,
    ) -> Result<String, BrainError> {
        if self.should_fail(&[original_message]) {
            return Err(Self::error());
        }
        self.fallback.draft_reply(original_message, tone).await
    }

    async fn answer_question(
        &self,
        summary_context: &str,
        question: &str,
    ) -> Result<String, BrainError> {
        if self.should_fail(&[summary_context, question]) {
            return Err(Self::error());
        }
        self.fallback.answer_question(summary_context, question).await
    }

    fn name(&self) -> &str {
        "FailingSummarizer"
    }
}
