//! Digest output type and parsing of model answers.

use serde::{Deserialize, Serialize};

use crate::error::BrainError;

/// Maximum number of key topics kept from a model answer.
pub const MAX_KEY_TOPICS: usize = 3;

/// A structured digest produced from a batch of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    /// Two-section report: overall situation, then per-topic bullets.
    pub summary_text: String,
    /// At most [`MAX_KEY_TOPICS`] short topic labels.
    pub key_topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawDigest {
    summary: String,
    key_topics: Vec<String>,
}

/// Parse a model answer into a [`Digest`].
///
/// Accepts a bare JSON object or one wrapped in a Markdown code fence.
/// Anything else (prose, missing fields, blank summary) is an error.
pub fn parse_digest(raw: &str) -> Result<Digest, BrainError> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(BrainError::InvalidResponse("empty response".to_string()));
    }

    let parsed: RawDigest = serde_json::from_str(body)
        .map_err(|e| BrainError::InvalidResponse(format!("digest is not valid JSON: {}", e)))?;

    let summary_text = parsed.summary.trim().to_string();
    if summary_text.is_empty() {
        return Err(BrainError::InvalidResponse("summary is empty".to_string()));
    }

    let key_topics = parsed
        .key_topics
        .into_iter()
        .map(|topic| topic.trim().to_string())
        .filter(|topic| !topic.is_empty())
        .take(MAX_KEY_TOPICS)
        .collect();

    Ok(Digest {
        summary_text,
        key_topics,
    })
}

/// Require a non-empty plain-text answer.
pub fn require_text(raw: &str) -> Result<String, BrainError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(BrainError::InvalidResponse("empty response".to_string()));
    }
    Ok(text.to_string())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line ("json") if present.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let digest = parse_digest(
            r#"{"summary": "【全体の状況】\n順調です。", "key_topics": ["deploy", "contract"]}"#,
        )
        .unwrap();
        assert!(digest.summary_text.starts_with("【全体の状況】"));
        assert_eq!(digest.key_topics, vec!["deploy", "contract"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"summary\": \"ok\", \"key_topics\": []}\n```";
        let digest = parse_digest(raw).unwrap();
        assert_eq!(digest.summary_text, "ok");
        assert!(digest.key_topics.is_empty());
    }

    #[test]
    fn test_parse_caps_topics() {
        let raw = r#"{"summary": "s", "key_topics": ["a", "b", " ", "c", "d"]}"#;
        let digest = parse_digest(raw).unwrap();
        assert_eq!(digest.key_topics, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            parse_digest(""),
            Err(BrainError::InvalidResponse(_))
        ));
        assert!(parse_digest("Here is your summary: all good").is_err());
        assert!(parse_digest(r#"{"summary": "missing topics"}"#).is_err());
        assert!(parse_digest(r#"{"summary": "  ", "key_topics": []}"#).is_err());
        assert!(parse_digest(r#"{"summary": "truncated", "key_top"#).is_err());
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("  了解です  ").unwrap(), "了解です");
        assert!(require_text(" \n ").is_err());
    }
}
