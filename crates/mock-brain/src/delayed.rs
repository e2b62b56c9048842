//! Delayed summarizer - wraps another summarizer with artificial delay.

use std::time::Duration;

use brain_core::{async_trait, BrainError, Digest, ReplyTone, Summarizer};
use tokio::time::sleep;

/// A summarizer that wraps another summarizer and adds artificial delay.
///
/// Useful for testing overlapping batch runs and simulating model latency.
pub struct DelayedSummarizer<S: Summarizer> {
    inner: S,
    delay: Duration,
}

impl<S: Summarizer> DelayedSummarizer<S> {
    /// Wrap `inner`, delaying every call by `delay`.
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a summarizer with a delay in milliseconds.
    pub fn with_millis(inner: S, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Access the wrapped summarizer.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: Summarizer> Summarizer for DelayedSummarizer<S> {
    async fn summarize(
        &self,
        messages: &[String],
        custom_instructions: Option<&str>,
    ) -> Result<Digest, BrainError> {
        sleep(self.delay).await;
        self.inner.summarize(messages, custom_instructions).await
    }

    async fn draft_reply(
        &self,
        original_message: &str,
        tone: ReplyTone,
    ) -> Result<String, BrainError> {
        sleep(self.delay).await;
        self.inner.draft_reply(original_message, tone).await
    }

    async fn answer_question(
        &self,
        summary_context: &str,
        question: &str,
    ) -> Result<String, BrainError> {
        sleep(self.delay).await;
        self.inner.answer_question(summary_context, question).await
    }

    fn name(&self) -> &str {
        "DelayedSummarizer"
    }
}
