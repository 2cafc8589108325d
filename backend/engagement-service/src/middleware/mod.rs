/// HTTP middleware for engagement-service
///
/// Request throttling backed by the shared `rate-limit` crate.
pub mod rate_limit;

pub use rate_limit::RateLimitMiddleware;
