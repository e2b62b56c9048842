//! Reply tones for drafted responses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BrainError;

/// The tone of a drafted reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyTone {
    Approve,
    Decline,
    Question,
    Neutral,
}

impl ReplyTone {
    /// All supported tones.
    pub const ALL: [ReplyTone; 4] = [
        ReplyTone::Approve,
        ReplyTone::Decline,
        ReplyTone::Question,
        ReplyTone::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyTone::Approve => "approve",
            ReplyTone::Decline => "decline",
            ReplyTone::Question => "question",
            ReplyTone::Neutral => "neutral",
        }
    }

    /// Instruction inserted into the reply prompt.
    pub fn instruction(&self) -> &'static str {
        match self {
            ReplyTone::Approve => "Agree to or accept the request politely and positively.",
            ReplyTone::Decline => {
                "Decline the request politely, without sounding cold, and offer an alternative if natural."
            }
            ReplyTone::Question => {
                "Ask a concise clarifying question about the unclear parts of the message."
            }
            ReplyTone::Neutral => "Acknowledge the message neutrally and briefly.",
        }
    }
}

impl fmt::Display for ReplyTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplyTone {
    type Err = BrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" => Ok(ReplyTone::Approve),
            "decline" => Ok(ReplyTone::Decline),
            "question" => Ok(ReplyTone::Question),
            "neutral" => Ok(ReplyTone::Neutral),
            other => Err(BrainError::Configuration(format!(
                "unknown reply tone: {}",
                other
            ))),
        }
    }
}
