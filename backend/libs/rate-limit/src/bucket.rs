/// Token bucket refill arithmetic
///
/// Time is injected as an `Instant` so every transition is testable without
/// sleeping. A bucket starts full, spends one token per acquisition and
/// refills continuously at the configured rate, capped at capacity.
use std::time::{Duration, Instant};

/// Outcome of one acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Allowed,
    /// Rejected; a token will be available after `retry_after`.
    Denied { retry_after: Duration },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Decision::Allowed => None,
            Decision::Denied { retry_after } => Some(*retry_after),
        }
    }
}

#[derive(Debug)]
pub(crate) struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl TokenBucket {
    pub(crate) fn new(capacity: u32, refill_per_sec: f64, now: Instant) -> Self {
        let capacity = f64::from(capacity.max(1));
        Self {
            capacity,
            tokens: capacity,
            // A zero rate would make retry_after unrepresentable.
            refill_per_sec: refill_per_sec.max(0.001),
            last_refill: now,
        }
    }

    pub(crate) fn try_acquire(&mut self, now: Instant) -> Decision {
        self.refill(now);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Decision::Allowed
        } else {
            let deficit = 1.0 - self.tokens;
            let secs = deficit / self.refill_per_sec;
            Decision::Denied {
                retry_after: Duration::from_secs_f64(secs),
            }
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        self.tokens =
            (self.tokens + elapsed.as_secs_f64() * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_bucket_allows_burst() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(3, 1.0, now);

        for _ in 0..3 {
            assert!(bucket.try_acquire(now).is_allowed());
        }
        assert!(!bucket.try_acquire(now).is_allowed());
    }

    #[test]
    fn test_refills_over_time() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(1, 2.0, now);

        assert!(bucket.try_acquire(now).is_allowed());
        assert!(!bucket.try_acquire(now).is_allowed());

        // 2 tokens/sec: after 600ms one token is back.
        let later = now + Duration::from_millis(600);
        assert!(bucket.try_acquire(later).is_allowed());
    }

    #[test]
    fn test_denial_reports_retry_after() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(1, 2.0, now);

        assert!(bucket.try_acquire(now).is_allowed());

        match bucket.try_acquire(now) {
            Decision::Denied { retry_after } => {
                assert!(retry_after > Duration::ZERO);
                assert!(retry_after <= Duration::from_millis(500));
            }
            Decision::Allowed => panic!("expected denial from an empty bucket"),
        }
    }

    #[test]
    fn test_refill_caps_at_capacity() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(2, 10.0, now);

        // A long idle period must not accumulate beyond the burst size.
        let later = now + Duration::from_secs(3600);
        assert!(bucket.try_acquire(later).is_allowed());
        assert!(bucket.try_acquire(later).is_allowed());
        assert!(!bucket.try_acquire(later).is_allowed());
    }
}
