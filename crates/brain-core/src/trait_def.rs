//! The Summarizer trait definition.

use async_trait::async_trait;

use crate::digest::Digest;
use crate::error::BrainError;
use crate::tone::ReplyTone;

/// A language-model backend that turns buffered messages into digests.
///
/// Implementations fail closed: any upstream error, empty answer or
/// unparseable output is returned as `Err`, never as a partial result.
/// This trait is object-safe and can be used with `Arc<dyn Summarizer>`.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize a batch of message texts.
    ///
    /// `custom_instructions` is appended to the fixed rule set as an extra,
    /// user-supplied rule.
    async fn summarize(
        &self,
        messages: &[String],
        custom_instructions: Option<&str>,
    ) -> Result<Digest, BrainError>;

    /// Draft a reply to a single message in the requested tone.
    async fn draft_reply(
        &self,
        original_message: &str,
        tone: ReplyTone,
    ) -> Result<String, BrainError>;

    /// Answer a question using a digest as context.
    async fn answer_question(
        &self,
        summary_context: &str,
        question: &str,
    ) -> Result<String, BrainError>;

    /// Get a human-readable name for this implementation.
    fn name(&self) -> &str;
}
