//! Rate limiting implementation
//!
//! Uses the governor crate for token bucket rate limiting. The upstream
//! portfolio service has no documented concurrency allowance, so the default
//! quota is one request per second with no burst.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Minimum spacing between replenished permits
    pub period: Duration,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            burst_size: 1,
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(period: Duration, burst_size: u32) -> Self {
        Self { period, burst_size }
    }

    /// One request every `period`, no burst
    pub fn every(period: Duration) -> Self {
        Self::new(period, 1)
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;

    #[test]
    fn test_rate_limiter_config_default() {
        let config = RateLimiterConfig::default();
        assert_eq!(config.period, Duration::from_secs(1));
        assert_eq!(config.burst_size, 1);
    }

    #[test]
    fn test_rate_limiter_config_every() {
        let every = RateLimiterConfig::every(Duration::from_millis(250));
        assert_eq!(every.period, Duration::from_millis(250));
        assert_eq!(every.burst_size, 1);
    }

    #[tokio::test]
    async fn test_rate_limiter_burst_then_waits() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(Duration::from_millis(100), 3));

        let start = std::time::Instant::now();
        for _ in 0..3 {
            limiter.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(80));

        // Bucket is empty; the next permit is one period away
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_zero_burst_is_clamped() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(Duration::from_millis(50), 0));
        limiter.wait().await;
    }
}
