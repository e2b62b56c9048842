//! Message buffer server.
//!
//! Hosts the trigger endpoints and, unless disabled, the in-process
//! scheduler for batch digests and retention sweeps.

use std::sync::Arc;

use buffer_server::{app, AppState, Config};
use database::Database;
use digest_brain::DigestBrain;
use pipeline::{BatchSummarizer, PipelineSettings, RetentionSweeper, Scheduler, SourcePoller};
use slack_client::SlackClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting buffer server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build pipeline components
    let settings = PipelineSettings::from_env();
    let slack = Arc::new(SlackClient::from_env()?);
    let brain = Arc::new(DigestBrain::from_env()?);

    let poller = SourcePoller::new(db.clone(), slack, settings.clone());
    let batch = Arc::new(BatchSummarizer::new(db.clone(), poller, brain));
    let sweeper = Arc::new(RetentionSweeper::new(db.clone(), settings.retention));

    let scheduler = if config.scheduler_enabled {
        let scheduler = Scheduler::new(batch.clone(), sweeper.clone())?;
        scheduler.start();
        Some(scheduler)
    } else {
        info!("Scheduler disabled; runs only via trigger endpoints");
        None
    };

    // Build application state and router
    let state = AppState::new(db.clone(), batch, sweeper, config.cron_secret.clone());
    let app = app(state);

    // Start server
    info!(addr = %config.addr, "Buffer server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler {
        scheduler.stop();
    }
    db.close().await;
    info!("Buffer server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
