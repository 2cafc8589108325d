/// Keyed limiter with idle-bucket eviction
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::bucket::{Decision, TokenBucket};

#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Steady-state tokens per second granted to each key
    pub per_second: f64,
    /// Bucket capacity, the burst a fresh key may spend at once
    pub burst: u32,
    /// Keys untouched for this long are dropped by the sweeper
    pub idle_ttl: Duration,
    /// How often the sweeper wakes up
    pub sweep_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            per_second: 10.0,
            burst: 20,
            idle_ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

struct KeyedBucket {
    bucket: TokenBucket,
    last_seen: Instant,
}

/// One bucket per key, created on first sight and refilled on access.
pub struct RateLimiter {
    config: RateLimiterConfig,
    buckets: DashMap<String, KeyedBucket>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            buckets: DashMap::new(),
        }
    }

    /// Spend one token for `key`.
    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Decision {
        let mut slot = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| KeyedBucket {
                bucket: TokenBucket::new(self.config.burst, self.config.per_second, now),
                last_seen: now,
            });

        slot.last_seen = now;
        slot.bucket.try_acquire(now)
    }

    /// Drop buckets idle past `idle_ttl`. Returns the eviction count.
    pub fn sweep_idle(&self) -> usize {
        self.sweep_idle_at(Instant::now())
    }

    fn sweep_idle_at(&self, now: Instant) -> usize {
        let before = self.buckets.len();
        let ttl = self.config.idle_ttl;
        self.buckets
            .retain(|_, slot| now.saturating_duration_since(slot.last_seen) < ttl);
        before.saturating_sub(self.buckets.len())
    }

    /// Number of live buckets, for readiness payloads.
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Periodic eviction loop. Runs until the owning task is dropped, so
    /// callers spawn it next to the server and cancel it on shutdown.
    pub async fn run_sweeper(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.config.sweep_interval);

        loop {
            ticker.tick().await;
            let evicted = self.sweep_idle();
            if evicted > 0 {
                debug!(
                    evicted,
                    remaining = self.tracked_keys(),
                    "evicted idle rate-limit buckets"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(burst: u32, per_second: f64, idle_ttl: Duration) -> RateLimiterConfig {
        RateLimiterConfig {
            per_second,
            burst,
            idle_ttl,
            sweep_interval: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_burst_then_denial_per_key() {
        let limiter = RateLimiter::new(test_config(2, 1.0, Duration::from_secs(300)));
        let now = Instant::now();

        assert!(limiter.check_at("a:/best", now).is_allowed());
        assert!(limiter.check_at("a:/best", now).is_allowed());
        assert!(!limiter.check_at("a:/best", now).is_allowed());
    }

    #[test]
    fn test_keys_are_isolated() {
        let limiter = RateLimiter::new(test_config(1, 1.0, Duration::from_secs(300)));
        let now = Instant::now();

        assert!(limiter.check_at("a:/best", now).is_allowed());
        assert!(!limiter.check_at("a:/best", now).is_allowed());

        // A different client, and the same client on another route, each
        // get their own bucket.
        assert!(limiter.check_at("b:/best", now).is_allowed());
        assert!(limiter.check_at("a:/leaderboard", now).is_allowed());
    }

    #[test]
    fn test_tokens_come_back_after_refill() {
        let limiter = RateLimiter::new(test_config(1, 2.0, Duration::from_secs(300)));
        let now = Instant::now();

        assert!(limiter.check_at("a:/best", now).is_allowed());
        assert!(!limiter.check_at("a:/best", now).is_allowed());

        let later = now + Duration::from_millis(600);
        assert!(limiter.check_at("a:/best", later).is_allowed());
    }

    #[test]
    fn test_sweep_evicts_only_idle_keys() {
        let limiter = RateLimiter::new(test_config(5, 1.0, Duration::from_secs(60)));
        let now = Instant::now();

        limiter.check_at("idle:/best", now);
        limiter.check_at("busy:/best", now);
        assert_eq!(limiter.tracked_keys(), 2);

        // Only "busy" is seen again before the sweep horizon.
        let later = now + Duration::from_secs(120);
        limiter.check_at("busy:/best", later);

        let evicted = limiter.sweep_idle_at(later);
        assert_eq!(evicted, 1);
        assert_eq!(limiter.tracked_keys(), 1);

        // The survivor still has its bucket.
        assert!(limiter.check_at("busy:/best", later).is_allowed());
    }

    #[test]
    fn test_sweep_with_nothing_idle_is_a_noop() {
        let limiter = RateLimiter::new(test_config(5, 1.0, Duration::from_secs(300)));
        let now = Instant::now();

        limiter.check_at("a:/best", now);
        assert_eq!(limiter.sweep_idle_at(now), 0);
        assert_eq!(limiter.tracked_keys(), 1);
    }
}
