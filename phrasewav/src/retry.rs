//! Opt-in retry with exponential backoff.
//!
//! Runs are fail-fast unless a [`RetryConfig`] is supplied. Only errors for
//! which [`Error::is_retryable`](crate::Error::is_retryable) holds are
//! retried; everything else surfaces immediately.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Configuration for retrying failed requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first call.
    pub max_attempts: u32,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Exponential backoff multiplier.
    pub backoff_multiplier: f64,
    /// Whether to add jitter to retry delays.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a config with `max_attempts` retries and default backoff.
    #[must_use]
    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (zero-based).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let base = self.initial_delay_ms as f64 * self.backoff_multiplier.max(1.0).powi(exponent);
        let scaled = if self.jitter {
            base * (0.5 + fastrand::f64() * 0.5)
        } else {
            base
        };
        Duration::from_millis(scaled.min(u64::MAX as f64) as u64)
    }
}

/// Run `op`, retrying retryable failures according to `config`.
///
/// With `config = None` the operation runs exactly once.
///
/// # Errors
///
/// Returns the first non-retryable error, or the last error once the retry
/// budget is spent.
pub async fn with_retry<T, F, Fut>(config: Option<&RetryConfig>, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retry = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let Some(config) = config else {
                    return Err(err);
                };
                if !err.is_retryable() || retry >= config.max_attempts {
                    return Err(err);
                }
                let delay = config.delay_for(retry);
                retry += 1;
                warn!(
                    error = %err,
                    attempt = retry,
                    max_attempts = config.max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying request"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
