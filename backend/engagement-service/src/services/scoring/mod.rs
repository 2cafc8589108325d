//! Engagement scoring formulas.
//!
//! Pure functions from counter snapshots to scores. Counters pass through a
//! zero-floor coercion so stale or corrupt snapshots can never push a score
//! negative or make it NaN.

use crate::models::{ContentKind, ScorableItem};

pub mod ranking;

/// Coerce a raw counter for arithmetic. Negative values mean a stale or
/// corrupt snapshot and count as zero.
pub(crate) fn counter(raw: i64) -> f64 {
    raw.max(0) as f64
}

/// Average of the finite entries in `ratings`, plus how many entries were
/// kept. Empty (or all non-finite) ratings average to zero.
fn rating_summary(ratings: &[f64]) -> (f64, f64) {
    let mut sum = 0.0;
    let mut kept = 0u32;
    for value in ratings.iter().filter(|v| v.is_finite()) {
        sum += value;
        kept += 1;
    }
    if kept == 0 {
        (0.0, 0.0)
    } else {
        (sum / f64::from(kept), f64::from(kept))
    }
}

/// All-time popularity for resources: bookmarks weighted double, plus the
/// full rating mass (average rating times rating count).
pub fn resource_popularity_score(item: &ScorableItem) -> f64 {
    let (average, count) = rating_summary(&item.ratings);
    counter(item.bookmark_count) * 2.0 + average * count
}

/// Primary engagement score for posts: votes weighted double, comments triple.
pub fn post_engagement_score(item: &ScorableItem) -> f64 {
    counter(item.vote_count) * 2.0 + counter(item.comment_count) * 3.0
}

/// The kind-appropriate primary score, used for single-item reads.
pub fn primary_score(item: &ScorableItem) -> f64 {
    match item.kind {
        ContentKind::Resource => resource_popularity_score(item),
        ContentKind::Post => post_engagement_score(item),
    }
}

/// Weights for the weekly-best formula.
///
/// Votes dominate by design tuning: one upvote moves the board as much as
/// ten views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyWeights {
    pub views: f64,
    pub votes: f64,
    pub comments: f64,
    pub bookmarks: f64,
}

impl Default for WeeklyWeights {
    fn default() -> Self {
        Self {
            views: 1.0,
            votes: 10.0,
            comments: 5.0,
            bookmarks: 5.0,
        }
    }
}

impl WeeklyWeights {
    /// Weekly engagement score. The comment term only applies to posts;
    /// resource comments do not enter the weekly formula.
    pub fn score(&self, item: &ScorableItem) -> f64 {
        let mut score = counter(item.view_count) * self.views
            + counter(item.vote_count) * self.votes
            + counter(item.bookmark_count) * self.bookmarks;
        if item.kind == ContentKind::Post {
            score += counter(item.comment_count) * self.comments;
        }
        score
    }
}
