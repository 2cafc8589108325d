/// Circuit breaker over a flaky dependency
///
/// State transitions:
/// - Closed → Open: consecutive failures reach the threshold
/// - Open → HalfOpen: after the cooldown elapses
/// - HalfOpen → Closed: consecutive successes reach the threshold
/// - HalfOpen → Open: on any failure
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, calls pass through
    Closed,
    /// Circuit is open, calls fail fast
    Open,
    /// Probing whether the dependency recovered
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half-open",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// Consecutive successes in HalfOpen that close it again
    pub success_threshold: u32,
    /// How long to stay open before probing
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            cooldown: Duration::from_secs(30),
        }
    }
}

struct BreakerState {
    current: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    opened_at: Option<Instant>,
}

#[derive(Debug, thiserror::Error)]
pub enum BreakerError<E> {
    #[error("circuit open, failing fast")]
    Open,
    #[error("call failed: {0}")]
    Inner(E),
}

#[derive(Clone)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: Arc<RwLock<BreakerState>>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(BreakerState {
                current: CircuitState::Closed,
                consecutive_failures: 0,
                consecutive_successes: 0,
                opened_at: None,
            })),
            config,
        }
    }

    /// Execute a future under breaker protection.
    ///
    /// The wrapped error keeps its type, so callers can distinguish a
    /// rejected call from a failed one.
    pub async fn call<F, Fut, T, E>(&self, f: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        if self.should_reject() {
            return Err(BreakerError::Open);
        }

        match f().await {
            Ok(result) => {
                self.record_success();
                Ok(result)
            }
            Err(e) => {
                self.record_failure();
                Err(BreakerError::Inner(e))
            }
        }
    }

    fn should_reject(&self) -> bool {
        let mut state = self.state.write();

        match state.current {
            CircuitState::Open => {
                if let Some(opened_at) = state.opened_at {
                    if opened_at.elapsed() >= self.config.cooldown {
                        info!("circuit breaker: open -> half-open");
                        state.current = CircuitState::HalfOpen;
                        state.consecutive_successes = 0;
                        state.consecutive_failures = 0;
                        false
                    } else {
                        true
                    }
                } else {
                    true
                }
            }
            CircuitState::HalfOpen | CircuitState::Closed => false,
        }
    }

    fn record_success(&self) {
        let mut state = self.state.write();

        state.consecutive_successes += 1;
        state.consecutive_failures = 0;

        if state.current == CircuitState::HalfOpen
            && state.consecutive_successes >= self.config.success_threshold
        {
            info!("circuit breaker: half-open -> closed");
            state.current = CircuitState::Closed;
        }
    }

    fn record_failure(&self) {
        let mut state = self.state.write();

        state.consecutive_failures += 1;
        state.consecutive_successes = 0;

        match state.current {
            CircuitState::Closed => {
                if state.consecutive_failures >= self.config.failure_threshold {
                    warn!(
                        failures = state.consecutive_failures,
                        "circuit breaker: closed -> open"
                    );
                    state.current = CircuitState::Open;
                    state.opened_at = Some(Instant::now());
                }
            }
            CircuitState::HalfOpen => {
                warn!("circuit breaker: half-open -> open (probe failed)");
                state.current = CircuitState::Open;
                state.opened_at = Some(Instant::now());
            }
            CircuitState::Open => {}
        }
    }

    /// Current state, for monitoring.
    pub fn state(&self) -> CircuitState {
        self.state.read().current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closed_to_open_on_consecutive_failures() {
        let config = CircuitBreakerConfig {
            failure_threshold: 3,
            ..Default::default()
        };
        let breaker = CircuitBreaker::new(config);

        for _ in 0..3 {
            let _ = breaker.call(|| async { Err::<(), _>("error") }).await;
        }

        assert_eq!(breaker.state(), CircuitState::Open);

        let result = breaker.call(|| async { Ok::<_, String>(()) }).await;
        assert!(matches!(result, Err(BreakerError::Open)));
    }

    #[tokio::test]
    async fn test_inner_error_keeps_its_type() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig::default());

        let result = breaker.call(|| async { Err::<(), _>("boom") }).await;
        assert!(matches!(result, Err(BreakerError::Inner("boom"))));
    }

    #[tokio::test]
    async fn test_open_to_halfopen_after_cooldown() {
        let config = CircuitBreakerConfig {
            failure_threshold: 2,
            cooldown: Duration::from_millis(100),
            ..Default::default()
        };
        let breaker = CircuitBreaker::new(config);

        for _ in 0..2 {
            let _ = breaker.call(|| async { Err::<(), _>("error") }).await;
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        tokio::time::sleep(Duration::from_millis(150)).await;

        let _ = breaker.call(|| async { Ok::<_, String>(()) }).await;
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
    }

    #[tokio::test]
    async fn test_halfopen_to_closed_on_successes() {
        let config = CircuitBreakerConfig {
            failure_threshold: 2,
            success_threshold: 2,
            cooldown: Duration::from_millis(100),
        };
        let breaker = CircuitBreaker::new(config);

        for _ in 0..2 {
            let _ = breaker.call(|| async { Err::<(), _>("error") }).await;
        }

        tokio::time::sleep(Duration::from_millis(150)).await;

        for _ in 0..2 {
            let _ = breaker.call(|| async { Ok::<_, String>(()) }).await;
        }

        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_halfopen_to_open_on_failure() {
        let config = CircuitBreakerConfig {
            failure_threshold: 2,
            cooldown: Duration::from_millis(100),
            ..Default::default()
        };
        let breaker = CircuitBreaker::new(config);

        for _ in 0..2 {
            let _ = breaker.call(|| async { Err::<(), _>("error") }).await;
        }

        tokio::time::sleep(Duration::from_millis(150)).await;
        let _ = breaker.call(|| async { Ok::<_, String>(()) }).await;

        let _ = breaker.call(|| async { Err::<(), _>("error") }).await;
        assert_eq!(breaker.state(), CircuitState::Open);
    }
}
