use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use rate_limit::RateLimiter;
use resilience::{AsyncState, CircuitBreaker, CircuitState, RetryPolicy};

use crate::store::{ContentStore, StoreError};

pub struct HealthState {
    pub store: Arc<dyn ContentStore>,
    pub store_probe: AsyncState<(), StoreError>,
    pub probe_policy: RetryPolicy,
    pub limiter: Arc<RateLimiter>,
    pub breaker: CircuitBreaker,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Serialize)]
pub struct ComponentCheck {
    pub status: ComponentStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<&'static str>,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub status: ComponentStatus,
    pub checks: HashMap<String, ComponentCheck>,
    pub timestamp: String,
}

pub async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.store.ping().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "engagement-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("content store ping failed: {}", e),
            "service": "engagement-service"
        })),
    }
}

pub async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut checks = HashMap::new();
    let mut ready = true;
    let mut degraded = false;

    let start = Instant::now();
    let store = state.store.clone();
    let probe_result = state
        .store_probe
        .run(&state.probe_policy, || {
            let store = store.clone();
            async move { store.ping().await }
        })
        .await;
    let store_latency = Some(start.elapsed().as_millis() as u64);
    let store_check = match probe_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "content store ping successful".to_string(),
            latency_ms: store_latency,
            phase: Some(state.store_probe.phase()),
        },
        Err(e) => {
            ready = false;
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("content store ping failed: {}", e),
                latency_ms: store_latency,
                phase: Some(state.store_probe.phase()),
            }
        }
    };
    checks.insert("store".to_string(), store_check);

    let breaker_check = match state.breaker.state() {
        CircuitState::Closed => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "circuit closed".to_string(),
            latency_ms: None,
            phase: None,
        },
        // Open and half-open boards degrade to empty payloads but keep
        // serving, so readiness stays true.
        state => {
            degraded = true;
            ComponentCheck {
                status: ComponentStatus::Degraded,
                message: format!("circuit {}", state.as_str()),
                latency_ms: None,
                phase: None,
            }
        }
    };
    checks.insert("ranking_breaker".to_string(), breaker_check);

    checks.insert(
        "rate_limiter".to_string(),
        ComponentCheck {
            status: ComponentStatus::Healthy,
            message: format!("{} tracked clients", state.limiter.tracked_keys()),
            latency_ms: None,
            phase: None,
        },
    );

    let status = if !ready {
        ComponentStatus::Unhealthy
    } else if degraded {
        ComponentStatus::Degraded
    } else {
        ComponentStatus::Healthy
    };

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
