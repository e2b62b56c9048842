//! Echo summarizer - turns the input back into a digest.

use std::sync::Mutex;

use async_trait::async_trait;
use brain_core::{BrainError, Digest, ReplyTone, Summarizer};

/// Arguments of one `summarize` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeCall {
    pub messages: Vec<String>,
    pub custom_instructions: Option<String>,
}

/// A summarizer whose digest is the input messages joined by newlines.
///
/// Every `summarize` call is recorded so tests can check what the
/// pipeline sent.
#[derive(Debug, Default)]
pub struct EchoSummarizer {
    prefix: Option<String>,
    calls: Mutex<Vec<SummarizeCall>>,
}

impl EchoSummarizer {
    /// Create a new EchoSummarizer with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an EchoSummarizer that starts every digest with `prefix`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_brain::EchoSummarizer;
    ///
    /// let brain = EchoSummarizer::with_prefix("Digest: ");
    /// // Digests will read "Digest: <first message>\n<second message>..."
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            calls: Mutex::default(),
        }
    }

    /// All recorded `summarize` calls, oldest first.
    pub fn calls(&self) -> Vec<SummarizeCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of `summarize` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub(crate) fn echo(&self, messages: &[String]) -> Digest {
        let body = messages.join("\n");
        let summary_text = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, body),
            None => body,
        };
        Digest {
            summary_text,
            key_topics: messages.iter().take(brain_core::MAX_KEY_TOPICS).cloned().collect(),
        }
    }
}

#[async_trait]
impl Summarizer for EchoSummarizer {
    async fn summarize(
        &self,
        messages: &[String],
        custom_instructions: Option<&str>,
    ) -> Result<Digest, BrainError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(SummarizeCall {
                messages: messages.to_vec(),
                custom_instructions: custom_instructions.map(str::to_string),
            });
        }
        if messages.is_empty() {
            return Err(BrainError::ProcessingFailed("nothing to summarize".to_string()));
        }
        Ok(self.echo(messages))
    }

    async fn draft_reply(
        &self,
        original_message: &str,
        tone: ReplyTone,
    ) -> Result<String, BrainError> {
        Ok(format!("[{}] {}", tone, original_message))
    }

    async fn answer_question(
        &self,
        summary_context: &str,
        question: &str,
    ) -> Result<String, BrainError> {
        Ok(format!("{} => {}", question, summary_context))
    }

    fn name(&self) -> &str {
        "EchoSummarizer"
    }
}
