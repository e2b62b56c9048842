//! Types for posting messages (`chat.postMessage`).

use serde::{Deserialize, Serialize};

/// Parameters for posting a message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostMessageParams {
    /// Channel, DM or group DM ID.
    pub channel: String,

    /// The message text.
    pub text: String,

    /// Parent message timestamp when replying in a thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

impl PostMessageParams {
    /// Create params for a top-level message.
    pub fn text(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            thread_ts: None,
        }
    }

    /// Reply in the thread rooted at `thread_ts`.
    pub fn in_thread(mut self, thread_ts: impl Into<String>) -> Self {
        self.thread_ts = Some(thread_ts.into());
        self
    }
}

/// Result of a successful post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    pub channel: String,
    pub ts: String,
}
