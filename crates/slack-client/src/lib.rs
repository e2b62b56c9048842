//! Slack Web API client library.
//!
//! This crate provides the small part of the Slack Web API the message
//! buffer needs:
//!
//! - Listing workspace members (`users.list`)
//! - Listing conversations of every kind (`conversations.list`)
//! - Reading recent channel history (`conversations.history`)
//! - Posting replies (`chat.postMessage`)
//!
//! The [`SlackApi`] trait is the seam used by the polling pipeline, so
//! tests can substitute a scripted implementation.
//!
//! # Example
//!
//! ```no_run
//! use slack_client::{SlackApi, SlackClient, SlackConfig};
//!
//! # async fn example() -> Result<(), slack_client::SlackError> {
//! let client = SlackClient::new(SlackConfig::default())?;
//! let page = client.list_channels("xoxb-token", None).await?;
//! for channel in page.items {
//!     println!("{} ({})", channel.label(), channel.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use api::SlackApi;
pub use client::{SlackClient, CONVERSATION_TYPES};
pub use config::SlackConfig;
pub use error::SlackError;
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
