//! Tunables for polling, batching and retention.

use std::env;
use std::time::Duration;

/// Pipeline settings. Defaults match production behavior.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// How far back each poll reads channel history.
    pub lookback: Duration,
    /// Pause between consecutive channel history requests.
    pub channel_delay: Duration,
    /// Wait after a 429 that carried no `Retry-After`.
    pub rate_limit_fallback: Duration,
    /// Upper bound on any single rate-limit wait.
    pub rate_limit_max_wait: Duration,
    /// Maximum pending items summarized per user per batch.
    pub batch_size: i64,
    /// Age after which processed items are deleted.
    pub retention: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            lookback: Duration::from_secs(4 * 60 * 60),
            channel_delay: Duration::from_millis(1200),
            rate_limit_fallback: Duration::from_secs(30),
            rate_limit_max_wait: Duration::from_secs(120),
            batch_size: 50,
            retention: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

impl PipelineSettings {
    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(hours) = env_u64("BUFFER_LOOKBACK_HOURS") {
            settings.lookback = Duration::from_secs(hours.saturating_mul(60 * 60));
        }
        if let Some(millis) = env_u64("BUFFER_CHANNEL_DELAY_MS") {
            settings.channel_delay = Duration::from_millis(millis);
        }
        if let Some(secs) = env_u64("BUFFER_RATE_LIMIT_FALLBACK_SECS") {
            settings.rate_limit_fallback = Duration::from_secs(secs);
        }
        if let Some(size) = env_u64("BUFFER_BATCH_SIZE").filter(|size| *size > 0) {
            settings.batch_size = i64::try_from(size).unwrap_or(i64::MAX);
        }
        if let Some(days) = env_u64("BUFFER_RETENTION_DAYS").filter(|days| *days > 0) {
            settings.retention = Duration::from_secs(days.saturating_mul(24 * 60 * 60));
        }

        settings
    }

    /// Settings with every pause set to zero.
    pub fn without_delays() -> Self {
        Self {
            channel_delay: Duration::ZERO,
            rate_limit_fallback: Duration::ZERO,
            ..Self::default()
        }
    }

    /// How long to wait after a rate-limit signal.
    pub fn rate_limit_wait(&self, retry_after: Option<Duration>) -> Duration {
        retry_after
            .unwrap_or(self.rate_limit_fallback)
            .min(self.rate_limit_max_wait)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok()?.trim().parse().ok()
}
