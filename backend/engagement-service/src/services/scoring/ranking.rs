use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::{MemberActivity, ScorableItem, Scored};

/// Anything the ranker can order. The score is supplied per call; recency
/// comes from the item itself and is only used to break ties.
pub trait Scorable {
    fn created_at(&self) -> DateTime<Utc>;
}

impl Scorable for ScorableItem {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Scorable for MemberActivity {
    fn created_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}

/// Score every item, sort descending, return the first `n`.
///
/// Ties break to the newer item. The input slice is never reordered; callers
/// keep their ordering. Asking for more than the input holds returns
/// everything.
pub fn rank_top_n<T, F>(items: &[T], n: usize, score_fn: F) -> Vec<Scored<T>>
where
    T: Scorable + Clone,
    F: Fn(&T) -> f64,
{
    let mut ranked: Vec<Scored<T>> = items
        .iter()
        .map(|item| Scored {
            item: item.clone(),
            score: score_fn(item),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.item.created_at().cmp(&a.item.created_at()))
    });
    ranked.truncate(n);

    debug!(
        candidate_count = items.len(),
        returned = ranked.len(),
        "ranked top-n"
    );

    ranked
}
