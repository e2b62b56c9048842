//! List the conversations visible to a bot token and their recent message counts.
//!
//! Run with: SLACK_BOT_TOKEN=xoxb-... cargo run -p slack-client --example list_channels

use std::time::{SystemTime, UNIX_EPOCH};

use slack_client::{SlackApi, SlackClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let token = std::env::var("SLACK_BOT_TOKEN")?;
    let client = SlackClient::from_env()?;

    let oldest = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() - 4 * 3600;
    let oldest = format!("{}.000000", oldest);

    let mut cursor: Option<String> = None;
    loop {
        let page = client.list_channels(&token, cursor.as_deref()).await?;
        for channel in &page.items {
            let history = client
                .channel_history(&token, &channel.id, &oldest, None)
                .await?;
            let more = if history.has_more() { "+" } else { "" };
            println!(
                "{:<24} {:>4}{} messages",
                channel.label(),
                history.items.len(),
                more
            );
        }
        cursor = page.next_cursor;
        if cursor.is_none() {
            break;
        }
    }

    Ok(())
}
