/// Retry with exponential backoff and jitter
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first call
    pub max_attempts: u32,
    /// Backoff after the first failed attempt
    pub initial_backoff: Duration,
    /// Upper bound for any single backoff
    pub max_backoff: Duration,
    /// Growth factor applied per attempt
    pub multiplier: f64,
    /// Randomize each backoff within [50%, 100%] of its nominal value
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that gives up after the first failure.
    pub fn no_retries() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Backoff to sleep after the given failed attempt (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31) as i32;
        let nominal = self.initial_backoff.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = nominal.min(self.max_backoff.as_millis() as f64);

        let millis = if self.jitter {
            let mut rng = rand::thread_rng();
            capped * rng.gen_range(0.5..1.0)
        } else {
            capped
        };

        Duration::from_millis(millis as u64)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
}

impl<E> RetryError<E> {
    /// The error from the final attempt.
    pub fn into_last(self) -> E {
        match self {
            RetryError::Exhausted { last, .. } => last,
        }
    }
}

/// Drive an async operation to success or exhaustion under `policy`.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                warn!(attempts = attempt, error = %e, "retries exhausted");
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: e,
                });
            }
            Err(e) => {
                let delay = policy.backoff_for(attempt);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
