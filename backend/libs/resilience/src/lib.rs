/// Resilience primitives shared across services
///
/// This library provides the request-lifecycle machinery the services
/// re-use instead of re-implementing per call site:
/// - **AsyncResult / AsyncState**: the idle → loading → success/error
///   lifecycle of an async operation, observable while it runs
/// - **Retry**: exponential backoff with jitter for transient failures
/// - **Circuit Breaker**: fails fast while a dependency is down, probes it
///   again after a cooldown
///
/// # Example: retrying a flaky call
///
/// ```rust,no_run
/// use resilience::{retry_with_backoff, RetryPolicy};
///
/// #[tokio::main]
/// async fn main() {
///     let policy = RetryPolicy::default();
///
///     let result = retry_with_backoff(&policy, || async {
///         Ok::<_, String>(42)
///     })
///     .await;
///
///     assert_eq!(result.unwrap(), 42);
/// }
/// ```
///
/// # Example: failing fast behind a breaker
///
/// ```rust,no_run
/// use resilience::{CircuitBreaker, CircuitBreakerConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let breaker = CircuitBreaker::new(CircuitBreakerConfig::default());
///
///     let result = breaker.call(|| async {
///         Ok::<_, String>(())
///     }).await;
///
///     assert!(result.is_ok());
/// }
/// ```
pub mod async_result;
pub mod circuit_breaker;
pub mod retry;

// Re-export main types for convenience
pub use async_result::{AsyncResult, AsyncState};
pub use circuit_breaker::{BreakerError, CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use retry::{retry_with_backoff, RetryError, RetryPolicy};
