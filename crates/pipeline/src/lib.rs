//! Message buffering pipeline.
//!
//! Pulls recent Slack messages from every connected workspace into a
//! SQLite buffer, condenses each user's pending items into a digest on a
//! fixed schedule, and deletes processed items after a retention window.
//!
//! # Components
//!
//! - [`SourcePoller`] - Reads channel history and buffers new human messages
//! - [`BatchSummarizer`] - Polls, then writes one digest per user with pending items
//! - [`RetentionSweeper`] - Deletes old processed Slack items
//! - [`Scheduler`] - Fires the batch and the sweep at fixed local times
//! - [`ReplyService`], [`Assistant`], [`LinkSaver`] - User-facing actions on the buffer
//! - [`urgency`] - Pure alert classification against user settings
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use database::Database;
//! use digest_brain::DigestBrain;
//! use pipeline::{BatchSummarizer, PipelineSettings, SourcePoller};
//! use slack_client::SlackClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite:buffer.db?mode=rwc").await?;
//! db.migrate().await?;
//!
//! let poller = SourcePoller::new(
//!     db.clone(),
//!     Arc::new(SlackClient::from_env()?),
//!     PipelineSettings::from_env(),
//! );
//! let batch = BatchSummarizer::new(db, poller, Arc::new(DigestBrain::from_env()?));
//!
//! let report = batch.run_batch().await?;
//! println!("{} users summarized", report.users_processed);
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod batch;
pub mod directory;
pub mod error;
pub mod links;
pub mod poller;
pub mod reply;
pub mod retention;
pub mod scheduler;
pub mod settings;
pub mod urgency;

pub use assistant::Assistant;
pub use batch::{format_item, BatchReport, BatchSummarizer, UserDigest};
pub use directory::{Member, UserDirectory};
pub use error::{PipelineError, Result};
pub use links::{LinkPreview, LinkSaver};
pub use poller::{InboundEvent, Ingested, PollReport, SourcePoller};
pub use reply::ReplyService;
pub use retention::RetentionSweeper;
pub use scheduler::Scheduler;
pub use settings::PipelineSettings;
pub use urgency::{classify, is_urgent, Urgency};
