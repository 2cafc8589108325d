use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{AppError, Result};
use crate::metrics::ranking::ENGAGEMENT_EVENTS_TOTAL;
use crate::models::{ContentKind, EngagementEvent, ScorableItem, Scored};
use crate::services::scoring;
use crate::store::ContentStore;

pub struct ContentState {
    pub store: Arc<dyn ContentStore>,
}

/// Counter snapshot body for `PUT /api/v1/content/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct ContentSnapshot {
    pub kind: ContentKind,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub bookmark_count: i64,
    #[serde(default)]
    #[validate(custom(function = "validate_ratings"))]
    pub ratings: Vec<f64>,
    pub created_at: DateTime<Utc>,
}

fn validate_ratings(ratings: &[f64]) -> std::result::Result<(), ValidationError> {
    for value in ratings {
        if !(0.0..=5.0).contains(value) {
            return Err(ValidationError::new("rating_out_of_range"));
        }
    }
    Ok(())
}

/// Receipt for a recorded engagement event: a server-assigned id plus the
/// updated snapshot.
#[derive(Debug, serde::Serialize)]
pub struct EngagementReceipt {
    pub event_id: Uuid,
    pub item: ScorableItem,
}

pub async fn upsert_content(
    path: web::Path<String>,
    body: web::Json<ContentSnapshot>,
    state: web::Data<ContentState>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "content id must not be empty".to_string(),
        ));
    }
    body.validate()?;

    let snapshot = body.into_inner();
    let item = ScorableItem {
        id: id.clone(),
        kind: snapshot.kind,
        view_count: snapshot.view_count,
        vote_count: snapshot.vote_count,
        comment_count: snapshot.comment_count,
        bookmark_count: snapshot.bookmark_count,
        ratings: snapshot.ratings,
        created_at: snapshot.created_at,
    };
    state.store.upsert_item(item.clone()).await?;

    info!(content_id = %id, kind = item.kind.as_str(), "content snapshot synced");

    Ok(HttpResponse::Ok().json(item))
}

pub async fn get_content(
    path: web::Path<String>,
    state: web::Data<ContentState>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let item = state
        .store
        .get_item(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(id.clone()))?;

    let score = scoring::primary_score(&item);
    Ok(HttpResponse::Ok().json(Scored { item, score }))
}

pub async fn record_engagement(
    path: web::Path<String>,
    body: web::Json<EngagementEvent>,
    state: web::Data<ContentState>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let event = body.into_inner();

    if let EngagementEvent::Rating { value } = &event {
        if !(0.0..=5.0).contains(value) {
            return Err(AppError::ValidationError(
                "rating value must be between 0 and 5".to_string(),
            ));
        }
    }

    let updated = state.store.record_event(&id, event.clone()).await?;
    ENGAGEMENT_EVENTS_TOTAL
        .with_label_values(&[event.as_str()])
        .inc();

    info!(content_id = %id, event = event.as_str(), "engagement event recorded");

    Ok(HttpResponse::Ok().json(EngagementReceipt {
        event_id: Uuid::new_v4(),
        item: updated,
    }))
}
