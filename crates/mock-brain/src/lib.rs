//! Mock summarizer implementations for the digest pipeline.
//!
//! This crate provides deterministic implementations of the `Summarizer`
//! trait for testing:
//! - `EchoSummarizer` - Joins the input messages into the digest and records calls
//! - `FailingSummarizer` - Fails every call, or only calls matching a marker
//! - `ScriptedSummarizer` - Returns queued results in call order
//! - `DelayedSummarizer` - Wraps another summarizer with artificial delay
//!
//! For production summaries, use the `digest-brain` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{EchoSummarizer, Summarizer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = EchoSummarizer::new();
//!
//!     let messages = vec!["#dev Alice: deploy failed".to_string()];
//!     let digest = brain.summarize(&messages, None).await?;
//!     assert!(digest.summary_text.contains("deploy failed"));
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod failing;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, Digest, ReplyTone, Summarizer};

pub use delayed::DelayedSummarizer;
pub use echo::{EchoSummarizer, SummarizeCall};
pub use failing::FailingSummarizer;
pub use scripted::ScriptedSummarizer;
