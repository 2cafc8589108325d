use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use resilience::{BreakerError, CircuitBreaker};

use crate::error::{AppError, Result};
use crate::metrics::ranking::{
    BOARD_DURATION_SECONDS, BOARD_REQUEST_TOTAL, RANKED_CANDIDATE_COUNT,
};
use crate::models::ScoredItem;
use crate::services::leaderboard::{LeaderboardReport, LeaderboardService};
use crate::services::weekly_best::{WeeklyBestReport, WeeklyBestService, WeeklyBestStats};

use super::clamp_limit;

#[derive(Debug, Deserialize)]
pub struct BoardQueryParams {
    pub limit: Option<usize>,
}

pub struct BoardState {
    pub weekly: Arc<WeeklyBestService>,
    pub leaderboard: Arc<LeaderboardService>,
    pub breaker: CircuitBreaker,
    pub max_board_limit: usize,
    pub max_leaderboard_limit: usize,
}

#[derive(Debug, Serialize)]
pub struct PopularResourcesResponse {
    pub resources: Vec<ScoredItem>,
    pub generated_at: DateTime<Utc>,
}

/// Served while the breaker is open: an empty board beats a 5xx for feed
/// consumers.
fn empty_weekly_report(window_days: i64) -> WeeklyBestReport {
    WeeklyBestReport {
        best_resources: Vec::new(),
        best_posts: Vec::new(),
        stats: WeeklyBestStats {
            window_days,
            resource_candidates: 0,
            post_candidates: 0,
            computed_at: Utc::now(),
        },
    }
}

pub async fn get_weekly_best(
    query: web::Query<BoardQueryParams>,
    state: web::Data<BoardState>,
) -> Result<HttpResponse> {
    let limit = clamp_limit(
        query.limit,
        state.weekly.default_limit(),
        state.max_board_limit,
    );
    let start = Instant::now();

    let weekly = state.weekly.clone();
    let result = state
        .breaker
        .call(|| async move { weekly.weekly_best(limit).await })
        .await;
    BOARD_DURATION_SECONDS
        .with_label_values(&["weekly"])
        .observe(start.elapsed().as_secs_f64());

    match result {
        Ok(report) => {
            BOARD_REQUEST_TOTAL.with_label_values(&["weekly", "ok"]).inc();
            RANKED_CANDIDATE_COUNT
                .with_label_values(&["resource"])
                .observe(report.stats.resource_candidates as f64);
            RANKED_CANDIDATE_COUNT
                .with_label_values(&["post"])
                .observe(report.stats.post_candidates as f64);
            Ok(HttpResponse::Ok().json(report))
        }
        Err(BreakerError::Open) => {
            warn!("weekly best degraded: circuit open");
            BOARD_REQUEST_TOTAL
                .with_label_values(&["weekly", "degraded"])
                .inc();
            Ok(HttpResponse::Ok().json(empty_weekly_report(state.weekly.window_days())))
        }
        Err(BreakerError::Inner(e)) => {
            BOARD_REQUEST_TOTAL
                .with_label_values(&["weekly", "error"])
                .inc();
            Err(AppError::from(e))
        }
    }
}

pub async fn get_popular_resources(
    query: web::Query<BoardQueryParams>,
    state: web::Data<BoardState>,
) -> Result<HttpResponse> {
    let limit = clamp_limit(
        query.limit,
        state.weekly.default_limit(),
        state.max_board_limit,
    );
    let start = Instant::now();

    let weekly = state.weekly.clone();
    let result = state
        .breaker
        .call(|| async move { weekly.popular_resources(limit).await })
        .await;
    BOARD_DURATION_SECONDS
        .with_label_values(&["resources"])
        .observe(start.elapsed().as_secs_f64());

    match result {
        Ok(resources) => {
            BOARD_REQUEST_TOTAL
                .with_label_values(&["resources", "ok"])
                .inc();
            Ok(HttpResponse::Ok().json(PopularResourcesResponse {
                resources,
                generated_at: Utc::now(),
            }))
        }
        Err(BreakerError::Open) => {
            warn!("popular resources degraded: circuit open");
            BOARD_REQUEST_TOTAL
                .with_label_values(&["resources", "degraded"])
                .inc();
            Ok(HttpResponse::Ok().json(PopularResourcesResponse {
                resources: Vec::new(),
                generated_at: Utc::now(),
            }))
        }
        Err(BreakerError::Inner(e)) => {
            BOARD_REQUEST_TOTAL
                .with_label_values(&["resources", "error"])
                .inc();
            Err(AppError::from(e))
        }
    }
}

pub async fn get_leaderboard(
    query: web::Query<BoardQueryParams>,
    state: web::Data<BoardState>,
) -> Result<HttpResponse> {
    let limit = clamp_limit(
        query.limit,
        state.leaderboard.default_limit(),
        state.max_leaderboard_limit,
    );
    let start = Instant::now();

    let leaderboard = state.leaderboard.clone();
    let result = state
        .breaker
        .call(|| async move { leaderboard.top_members(limit).await })
        .await;
    BOARD_DURATION_SECONDS
        .with_label_values(&["leaderboard"])
        .observe(start.elapsed().as_secs_f64());

    match result {
        Ok(report) => {
            BOARD_REQUEST_TOTAL
                .with_label_values(&["leaderboard", "ok"])
                .inc();
            RANKED_CANDIDATE_COUNT
                .with_label_values(&["member"])
                .observe(report.member_count as f64);
            Ok(HttpResponse::Ok().json(report))
        }
        Err(BreakerError::Open) => {
            warn!("leaderboard degraded: circuit open");
            BOARD_REQUEST_TOTAL
                .with_label_values(&["leaderboard", "degraded"])
                .inc();
            Ok(HttpResponse::Ok().json(LeaderboardReport {
                entries: Vec::new(),
                member_count: 0,
                generated_at: Utc::now(),
            }))
        }
        Err(BreakerError::Inner(e)) => {
            BOARD_REQUEST_TOTAL
                .with_label_values(&["leaderboard", "error"])
                .inc();
            Err(AppError::from(e))
        }
    }
}
