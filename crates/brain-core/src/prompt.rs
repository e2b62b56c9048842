//! Prompt construction and fingerprinting.

use sha2::{Digest, Sha256};

use crate::tone::ReplyTone;

/// Fixed rules for digest generation.
pub const SUMMARY_RULES: &str = "\
You are an assistant that condenses buffered chat messages into a short report.
Rules:
1. Ignore small talk, greetings, thanks and system notices.
2. Keep only urgent requests, decisions, and information someone must act on.
3. Write the report in Japanese with exactly two sections:
   【全体の状況】 one short paragraph describing the overall situation.
   【トピック別】 a bulleted list with one bullet per topic.
4. Extract at most 3 key topics as short labels.
5. Never output raw user IDs (such as U012ABCDEF). Use the display names given in the messages.";

/// Output contract appended after the rules.
pub const SUMMARY_OUTPUT_FORMAT: &str = "\
Respond with a single JSON object and nothing else:
{\"summary\": \"<report text>\", \"key_topics\": [\"<topic>\", ...]}";

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// System prompt for summarization, with the user's rule appended.
pub fn summary_system_prompt(custom_instructions: Option<&str>) -> String {
    let mut prompt = String::from(SUMMARY_RULES);
    if let Some(extra) = custom_instructions
        .map(str::trim)
        .filter(|extra| !extra.is_empty())
    {
        prompt.push_str("\n6. Additional rule from the user: ");
        prompt.push_str(extra);
    }
    prompt.push_str("\n\n");
    prompt.push_str(SUMMARY_OUTPUT_FORMAT);
    prompt
}

/// User prompt listing the messages, one per line.
pub fn summary_user_prompt(messages: &[String]) -> String {
    let mut prompt = String::from("Messages:\n");
    for message in messages {
        prompt.push_str("- ");
        prompt.push_str(&collapse_lines(message));
        prompt.push('\n');
    }
    prompt
}

/// System prompt for reply drafting.
pub fn reply_system_prompt(tone: ReplyTone) -> String {
    format!(
        "You draft short Slack replies in Japanese on behalf of the user. \
         {} Output only the reply text, with no preamble or quotation marks.",
        tone.instruction()
    )
}

/// System prompt for answering questions about a digest.
pub fn answer_system_prompt(summary_context: &str) -> String {
    format!(
        "You answer the user's questions in Japanese using only the report below. \
         If the report does not contain the answer, say so briefly.\n\nReport:\n{}",
        summary_context.trim()
    )
}

fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
