/// Token-bucket rate limiting keyed by caller
///
/// The limiter owns one bucket per key (typically `client:route`) and
/// refills them lazily on access, so idle keys cost nothing until the
/// sweeper drops them. It is deliberately process-local: a deployment that
/// needs shared limits swaps the store behind the same component boundary.
///
/// # Example
///
/// ```rust
/// use rate_limit::{RateLimiter, RateLimiterConfig};
///
/// let limiter = RateLimiter::new(RateLimiterConfig {
///     burst: 2,
///     ..Default::default()
/// });
///
/// assert!(limiter.check("10.0.0.1:/api/v1/best/weekly").is_allowed());
/// ```
pub mod bucket;
pub mod limiter;

pub use bucket::Decision;
pub use limiter::{RateLimiter, RateLimiterConfig};
