//! Scripted summarizer - replays queued results in call order.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use brain_core::{BrainError, Digest, ReplyTone, Summarizer};

use crate::echo::EchoSummarizer;

/// A summarizer that returns pre-queued `summarize` results in order.
///
/// Once the queue is empty, calls echo their input.
#[derive(Debug, Default)]
pub struct ScriptedSummarizer {
    script: Mutex<VecDeque<Result<Digest, BrainError>>>,
    fallback: EchoSummarizer,
}

impl ScriptedSummarizer {
    /// Create a summarizer with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful digest with the given text.
    pub fn then_digest(self, summary_text: impl Into<String>) -> Self {
        self.push(Ok(Digest {
            summary_text: summary_text.into(),
            key_topics: Vec::new(),
        }))
    }

    /// Queue a failure.
    pub fn then_error(self, error: BrainError) -> Self {
        self.push(Err(error))
    }

    /// Number of queued results not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or_default()
    }

    fn push(self, result: Result<Digest, BrainError>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(result);
        }
        self
    }

    fn next(&self) -> Option<Result<Digest, BrainError>> {
        self.script.lock().ok().and_then(|mut s| s.pop_front())
    }
}

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    async fn summarize(
        &self,
        messages: &[String],
        custom_instructions: Option<&str>,
    ) -> Result<Digest, BrainError> {
        match self.next() {
            Some(result) => result,
            None => self.fallback.summarize(messages, custom_instructions).await,
        }
    }

    async fn draft_reply(
        &self,
        original_message: &str,
        tone: ReplyTone,
    ) -> Result<String, BrainError> {
        self.fallback.draft_reply(original_message, tone).await
    }

    async fn answer_question(
        &self,
        summary_context: &str,
        question: &str,
    ) -> Result<String, BrainError> {
        self.fallback.answer_question(summary_context, question).await
    }

    fn name(&self) -> &str {
        "ScriptedSummarizer"
    }
}
