//! Core trait and types for digest brains.
//!
//! This crate provides the shared interface between the summarization
//! pipeline and language-model backends. It defines:
//!
//! - [`Summarizer`] - The trait every backend implements
//! - [`Digest`] - The structured output of a summarization call
//! - [`ReplyTone`] - The fixed set of tones for drafted replies
//! - [`BrainError`] - Error types for brain operations
//! - Prompt builders shared by all backends
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, BrainError, Digest, ReplyTone, Summarizer};
//!
//! struct FixedBrain;
//!
//! #[async_trait]
//! impl Summarizer for FixedBrain {
//!     async fn summarize(
//!         &self,
//!         messages: &[String],
//!         _custom_instructions: Option<&str>,
//!     ) -> Result<Digest, BrainError> {
//!         Ok(Digest {
//!             summary_text: format!("{} messages", messages.len()),
//!             key_topics: Vec::new(),
//!         })
//!     }
//!
//!     async fn draft_reply(&self, _original: &str, tone: ReplyTone) -> Result<String, BrainError> {
//!         Ok(tone.to_string())
//!     }
//!
//!     async fn answer_question(&self, _context: &str, _question: &str) -> Result<String, BrainError> {
//!         Err(BrainError::ProcessingFailed("not supported".to_string()))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "FixedBrain"
//!     }
//! }
//! ```

mod digest;
mod error;
mod prompt;
mod tone;
mod trait_def;

pub use digest::{parse_digest, require_text, Digest, MAX_KEY_TOPICS};
pub use error::BrainError;
pub use prompt::{
    answer_system_prompt, hash_prompt, reply_system_prompt, summary_system_prompt,
    summary_user_prompt, SUMMARY_OUTPUT_FORMAT, SUMMARY_RULES,
};
pub use tone::ReplyTone;
pub use trait_def::Summarizer;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
