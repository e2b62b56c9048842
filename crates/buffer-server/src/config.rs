//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Buffer server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Shared secret for the cron trigger endpoints. `None` disables them.
    pub cron_secret: Option<String>,
    /// Whether the in-process scheduler runs.
    pub scheduler_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BUFFER_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:buffer.db?mode=rwc` |
    /// | `CRON_SECRET` | Bearer secret for `/api/cron/*` | (unset: endpoints answer 503) |
    /// | `SCHEDULER_ENABLED` | Run timed batches and sweeps | `true` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("BUFFER_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:buffer.db?mode=rwc".to_string());

        let cron_secret = env::var("CRON_SECRET")
            .ok()
            .map(|secret| secret.trim().to_string())
            .filter(|secret| !secret.is_empty());

        let scheduler_enabled = match env::var("SCHEDULER_ENABLED") {
            Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag {
                name: "SCHEDULER_ENABLED",
                value,
            })?,
            Err(_) => true,
        };

        Ok(Self {
            addr,
            database_url,
            cron_secret,
            scheduler_enabled,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid BUFFER_ADDR format")]
    InvalidAddr,

    #[error("{name} must be true or false, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },
}
