use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use resilience::{retry_with_backoff, RetryError, RetryPolicy};

use crate::models::MemberActivity;
use crate::services::scoring::{counter, ranking::rank_top_n};
use crate::store::{ContentStore, StoreError};

/// Points awarded per unit of member activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointWeights {
    pub posts_created: f64,
    pub comments_written: f64,
    pub votes_received: f64,
    pub bookmarks_received: f64,
}

impl Default for PointWeights {
    fn default() -> Self {
        Self {
            posts_created: 10.0,
            comments_written: 5.0,
            votes_received: 2.0,
            bookmarks_received: 3.0,
        }
    }
}

impl PointWeights {
    /// Point total for one member, with the same zero-floor as content
    /// scoring.
    pub fn points(&self, member: &MemberActivity) -> f64 {
        counter(member.posts_created) * self.posts_created
            + counter(member.comments_written) * self.comments_written
            + counter(member.votes_received) * self.votes_received
            + counter(member.bookmarks_received) * self.bookmarks_received
    }
}

/// Cumulative point totals needed to reach each level. Index 0 is level 1.
pub const LEVEL_THRESHOLDS: [f64; 6] = [0.0, 100.0, 300.0, 700.0, 1500.0, 3000.0];

/// The level a point total earns, 1 through 6.
pub fn level_for_points(points: f64) -> u32 {
    let reached = LEVEL_THRESHOLDS
        .iter()
        .rposition(|threshold| points >= *threshold)
        .unwrap_or(0);
    (reached + 1) as u32
}

/// The next threshold above `points`, or `None` at the top level.
pub fn next_level_at(points: f64) -> Option<f64> {
    LEVEL_THRESHOLDS
        .iter()
        .copied()
        .find(|threshold| points < *threshold)
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub member_id: String,
    pub display_name: Option<String>,
    pub points: f64,
    pub level: u32,
    pub next_level_at: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardReport {
    pub entries: Vec<LeaderboardEntry>,
    pub member_count: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    pub default_limit: usize,
    pub weights: PointWeights,
    pub retry: RetryPolicy,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            default_limit: 25,
            weights: PointWeights::default(),
            retry: RetryPolicy::default(),
        }
    }
}

pub struct LeaderboardService {
    store: Arc<dyn ContentStore>,
    config: LeaderboardConfig,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn ContentStore>, config: LeaderboardConfig) -> Self {
        Self { store, config }
    }

    pub fn default_limit(&self) -> usize {
        self.config.default_limit
    }

    /// Rank members by points. Ties go to the member who joined later.
    pub async fn top_members(&self, limit: usize) -> Result<LeaderboardReport, StoreError> {
        let members = retry_with_backoff(&self.config.retry, || self.store.fetch_members())
            .await
            .map_err(RetryError::into_last)?;

        let weights = self.config.weights;
        let ranked = rank_top_n(&members, limit, |member| weights.points(member));

        let entries = ranked
            .into_iter()
            .enumerate()
            .map(|(index, scored)| LeaderboardEntry {
                rank: index + 1,
                member_id: scored.item.member_id,
                display_name: scored.item.display_name,
                points: scored.score,
                level: level_for_points(scored.score),
                next_level_at: next_level_at(scored.score),
            })
            .collect();

        info!(member_count = members.len(), limit, "computed leaderboard");

        Ok(LeaderboardReport {
            entries,
            member_count: members.len(),
            generated_at: Utc::now(),
        })
    }
}
