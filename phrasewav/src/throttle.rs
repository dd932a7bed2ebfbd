//! Fixed post-call pause.

use std::time::Duration;

use tracing::debug;

/// Sleeps for a fixed interval after every remote call.
///
/// The pause is unconditional and not adaptive; it keeps a sequential batch
/// under the service's requests-per-minute quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
}

impl Throttle {
    /// Default pause between calls.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

    /// Create a throttle with the given interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// A throttle that never waits.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// The configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the configured interval.
    pub async fn pause(&self) {
        if self.interval.is_zero() {
            return;
        }
        debug!(secs = self.interval.as_secs_f64(), "throttling");
        tokio::time::sleep(self.interval).await;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn default_is_thirty_seconds() {
        assert_eq!(Throttle::default().interval(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_waits_full_interval() {
        let throttle = Throttle::new(Duration::from_secs(30));
        let start = Instant::now();
        throttle.pause().await;
        assert!(start.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_does_not_wait() {
        let start = Instant::now();
        Throttle::disabled().pause().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
