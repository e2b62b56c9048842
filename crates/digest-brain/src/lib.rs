//! Chat-completions based digest brain.
//!
//! This crate provides a [`Summarizer`] implementation that talks to any
//! OpenAI-compatible `/v1/chat/completions` endpoint.
//!
//! # Features
//!
//! - Two-section Japanese digests parsed from a JSON answer
//! - Reply drafting in a fixed set of tones
//! - Question answering over the latest digest
//! - Fails closed: missing key, upstream errors and malformed answers are errors
//!
//! # Usage
//!
//! ```rust,no_run
//! use digest_brain::{DigestBrain, Summarizer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = DigestBrain::from_env()?;
//!     let digest = brain
//!         .summarize(&["#ops Bob: the deploy failed".to_string()], None)
//!         .await?;
//!     println!("{}", digest.summary_text);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::DigestBrain;
pub use config::{DigestBrainConfig, DigestBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, Digest, ReplyTone, Summarizer};
