use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;

use resilience::{retry_with_backoff, RetryError, RetryPolicy};

use crate::models::{ContentKind, ScorableItem, ScoredItem};
use crate::services::scoring::{self, ranking::rank_top_n, WeeklyWeights};
use crate::store::{ContentFilter, ContentStore, StoreError};

/// Tuning for the weekly boards.
#[derive(Debug, Clone)]
pub struct WeeklyBestConfig {
    pub window_days: i64,
    pub default_limit: usize,
    pub weights: WeeklyWeights,
    pub retry: RetryPolicy,
}

impl Default for WeeklyBestConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            default_limit: 10,
            weights: WeeklyWeights::default(),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyBestStats {
    pub window_days: i64,
    pub resource_candidates: usize,
    pub post_candidates: usize,
    pub computed_at: DateTime<Utc>,
}

/// The weekly board payload: top resources and posts plus window metadata.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyBestReport {
    pub best_resources: Vec<ScoredItem>,
    pub best_posts: Vec<ScoredItem>,
    pub stats: WeeklyBestStats,
}

pub struct WeeklyBestService {
    store: Arc<dyn ContentStore>,
    config: WeeklyBestConfig,
}

impl WeeklyBestService {
    pub fn new(store: Arc<dyn ContentStore>, config: WeeklyBestConfig) -> Self {
        Self { store, config }
    }

    pub fn default_limit(&self) -> usize {
        self.config.default_limit
    }

    pub fn window_days(&self) -> i64 {
        self.config.window_days
    }

    async fn fetch_with_retry(
        &self,
        filter: &ContentFilter,
    ) -> Result<Vec<ScorableItem>, StoreError> {
        retry_with_backoff(&self.config.retry, || self.store.fetch_items(filter))
            .await
            .map_err(RetryError::into_last)
    }

    /// Rank this week's resources and posts. An empty window is an empty
    /// report, not an error.
    pub async fn weekly_best(&self, limit: usize) -> Result<WeeklyBestReport, StoreError> {
        let now = Utc::now();
        let window_start = now - Duration::days(self.config.window_days);

        let resources = self
            .fetch_with_retry(
                &ContentFilter::new()
                    .with_kind(ContentKind::Resource)
                    .with_created_after(window_start)
                    .with_created_before(now),
            )
            .await?;
        let posts = self
            .fetch_with_retry(
                &ContentFilter::new()
                    .with_kind(ContentKind::Post)
                    .with_created_after(window_start)
                    .with_created_before(now),
            )
            .await?;

        let weights = self.config.weights;
        let best_resources = rank_top_n(&resources, limit, |item| weights.score(item));
        let best_posts = rank_top_n(&posts, limit, |item| weights.score(item));

        info!(
            window_days = self.config.window_days,
            resource_candidates = resources.len(),
            post_candidates = posts.len(),
            limit,
            "computed weekly best"
        );

        Ok(WeeklyBestReport {
            best_resources,
            best_posts,
            stats: WeeklyBestStats {
                window_days: self.config.window_days,
                resource_candidates: resources.len(),
                post_candidates: posts.len(),
                computed_at: now,
            },
        })
    }

    /// All-time resource ranking by the primary popularity formula.
    pub async fn popular_resources(&self, limit: usize) -> Result<Vec<ScoredItem>, StoreError> {
        let resources = self
            .fetch_with_retry(&ContentFilter::new().with_kind(ContentKind::Resource))
            .await?;
        Ok(rank_top_n(
            &resources,
            limit,
            scoring::resource_popularity_score,
        ))
    }
}
