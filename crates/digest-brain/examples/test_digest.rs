//! Summarize a few sample messages with the configured model.
//!
//! Run with: cargo run -p digest-brain --example test_digest
//!
//! Make sure to set environment variables in .env:
//!   LLM_API_KEY - API key for the chat completions endpoint

use digest_brain::{DigestBrain, ReplyTone, Summarizer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let brain = DigestBrain::from_env()?;
    println!("Model: {}", brain.config().model);

    let messages = vec![
        "#ops Bob: the production deploy failed, rolling back".to_string(),
        "#random Carol: anyone up for lunch?".to_string(),
        "#sales Dave: the ACME contract is signed".to_string(),
    ];

    let digest = brain.summarize(&messages, None).await?;
    println!("{}", digest.summary_text);
    println!("Topics: {:?}", digest.key_topics);

    let reply = brain.draft_reply(&messages[0], ReplyTone::Question).await?;
    println!("Draft reply: {}", reply);

    Ok(())
}
