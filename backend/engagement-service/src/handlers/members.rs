use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::MemberActivity;

use super::content::ContentState;

/// Activity counters body for `PUT /api/v1/members/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct MemberSnapshot {
    #[validate(length(min = 1, max = 64))]
    pub display_name: Option<String>,
    #[serde(default)]
    pub posts_created: i64,
    #[serde(default)]
    pub comments_written: i64,
    #[serde(default)]
    pub votes_received: i64,
    #[serde(default)]
    pub bookmarks_received: i64,
    pub joined_at: DateTime<Utc>,
}

pub async fn upsert_member(
    path: web::Path<String>,
    body: web::Json<MemberSnapshot>,
    state: web::Data<ContentState>,
) -> Result<HttpResponse> {
    let member_id = path.into_inner();
    if member_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "member id must not be empty".to_string(),
        ));
    }
    body.validate()?;

    let snapshot = body.into_inner();
    let member = MemberActivity {
        member_id: member_id.clone(),
        display_name: snapshot.display_name,
        posts_created: snapshot.posts_created,
        comments_written: snapshot.comments_written,
        votes_received: snapshot.votes_received,
        bookmarks_received: snapshot.bookmarks_received,
        joined_at: snapshot.joined_at,
    };
    state.store.upsert_member(member.clone()).await?;

    info!(member_id = %member_id, "member activity synced");

    Ok(HttpResponse::Ok().json(member))
}
