//! Rate limiting middleware for the engagement API
//!
//! Applies the shared token-bucket limiter per client per route. The client
//! ip comes from `X-Forwarded-For` (first hop, respecting proxies) with the
//! peer address as fallback; denials answer 429 with a `Retry-After` header.

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::warn;

use rate_limit::RateLimiter;

use crate::error::AppError;
use crate::metrics::ranking::RATE_LIMITED_TOTAL;

/// Rate limit middleware factory
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let route = req
            .match_pattern()
            .unwrap_or_else(|| req.path().to_string());
        let key = format!("{}:{}", extract_client_ip(&req), route);

        let decision = self.limiter.check(&key);
        if let Some(retry_after) = decision.retry_after() {
            let retry_after_secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
            warn!(%key, retry_after_secs, "rate limit exceeded");
            RATE_LIMITED_TOTAL.with_label_values(&[route.as_str()]).inc();
            let response = AppError::RateLimited { retry_after_secs }.error_response();
            return Box::pin(async move { Ok(req.into_response(response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_boxed_body())
        })
    }
}

/// Extract client IP from request, respecting X-Forwarded-For header
fn extract_client_ip(req: &ServiceRequest) -> IpAddr {
    if let Some(x_forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(header_value) = x_forwarded_for.to_str() {
            // X-Forwarded-For can contain multiple IPs; take the first one
            if let Some(first_ip) = header_value.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}
