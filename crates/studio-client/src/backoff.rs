//! Upload retry policy.
//!
//! Uploads to a pre-signed URL are retried a bounded number of times with a
//! fixed delay between attempts. The delay itself is delegated to a
//! [`Backoff`] strategy so tests can substitute a fake clock.

use std::time::Duration;

use async_trait::async_trait;

/// Configuration for upload retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRetryConfig {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl Default for UploadRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl UploadRetryConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: std::env::var("STUDIO_UPLOAD_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_attempts),
            delay: std::env::var("STUDIO_UPLOAD_RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.delay),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Waits between upload attempts.
#[async_trait]
pub trait Backoff: Send + Sync {
    /// Wait before attempt number `next_attempt` (2 for the first retry).
    async fn wait(&self, next_attempt: u32, delay: Duration);
}

/// Sleeps for the configured delay on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDelay;

#[async_trait]
impl Backoff for FixedDelay {
    async fn wait(&self, _next_attempt: u32, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
