/// Observable lifecycle for an async operation
///
/// `AsyncResult` is the value: idle until a run starts, loading while
/// attempts are in flight, then success or error. `AsyncState` is the shared
/// holder: one side drives an operation with `run`, any other side reads
/// `snapshot` (readiness endpoints, log decorators) without touching the
/// operation itself.
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::retry::{RetryError, RetryPolicy};

#[derive(Debug, Clone, PartialEq)]
pub enum AsyncResult<T, E> {
    /// No run started yet
    Idle,
    /// A run is in flight, `attempt` is 1-based
    Loading { attempt: u32 },
    /// The last run finished with this value
    Success(T),
    /// The last run failed for good after `attempts` tries
    Error { error: E, attempts: u32 },
}

impl<T, E> AsyncResult<T, E> {
    pub fn is_idle(&self) -> bool {
        matches!(self, AsyncResult::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AsyncResult::Loading { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AsyncResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AsyncResult::Error { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            AsyncResult::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            AsyncResult::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Short label for logs and health payloads.
    pub fn phase(&self) -> &'static str {
        match self {
            AsyncResult::Idle => "idle",
            AsyncResult::Loading { .. } => "loading",
            AsyncResult::Success(_) => "success",
            AsyncResult::Error { .. } => "error",
        }
    }

    /// Map the success value, leaving the other phases untouched.
    pub fn map<U, F>(self, f: F) -> AsyncResult<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            AsyncResult::Idle => AsyncResult::Idle,
            AsyncResult::Loading { attempt } => AsyncResult::Loading { attempt },
            AsyncResult::Success(value) => AsyncResult::Success(f(value)),
            AsyncResult::Error { error, attempts } => AsyncResult::Error { error, attempts },
        }
    }
}

/// Shared handle over the lifecycle of one logical operation.
pub struct AsyncState<T, E> {
    inner: Arc<RwLock<AsyncResult<T, E>>>,
}

impl<T, E> Clone for AsyncState<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Default for AsyncState<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> AsyncState<T, E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(AsyncResult::Idle)),
        }
    }

    pub fn phase(&self) -> &'static str {
        self.inner.read().phase()
    }

    fn set(&self, next: AsyncResult<T, E>) {
        *self.inner.write() = next;
    }
}

impl<T, E> AsyncState<T, E>
where
    T: Clone,
    E: Clone,
{
    pub fn snapshot(&self) -> AsyncResult<T, E> {
        self.inner.read().clone()
    }

    /// Drive `op` through the lifecycle under `policy`.
    ///
    /// Every transition lands in the shared state, so observers see
    /// `Loading { attempt }` while the operation runs and the final
    /// `Success`/`Error` afterwards.
    pub async fn run<F, Fut>(&self, policy: &RetryPolicy, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            self.set(AsyncResult::Loading { attempt });

            match op().await {
                Ok(value) => {
                    self.set(AsyncResult::Success(value.clone()));
                    return Ok(value);
                }
                Err(e) if attempt >= max_attempts => {
                    self.set(AsyncResult::Error {
                        error: e.clone(),
                        attempts: attempt,
                    });
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }
                Err(e) => {
                    let delay = policy.backoff_for(attempt);
                    debug!(attempt, error = %e, "run attempt failed, backing off");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
