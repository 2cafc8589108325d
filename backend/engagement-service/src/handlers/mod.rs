/// HTTP handlers for engagement endpoints
///
/// This module contains handlers for:
/// - Boards: weekly best content, all-time popular resources, member leaderboard
/// - Content: counter snapshot sync, single-item reads, engagement events
/// - Members: member activity sync
/// - Health: liveness, readiness, and summary endpoints
pub mod boards;
pub mod content;
pub mod health;
pub mod members;

// Re-export handler functions at module level
pub use boards::{get_leaderboard, get_popular_resources, get_weekly_best};
pub use content::{get_content, record_engagement, upsert_content};
pub use health::{health_summary, liveness_check, readiness_summary};
pub use members::upsert_member;

/// Resolve an optional `limit` query parameter against a default and an
/// upper bound.
pub(crate) fn clamp_limit(requested: Option<usize>, default: usize, max: usize) -> usize {
    requested.unwrap_or(default).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::clamp_limit;

    #[test]
    fn missing_limit_falls_back_to_the_default() {
        assert_eq!(clamp_limit(None, 10, 50), 10);
    }

    #[test]
    fn zero_clamps_up_to_one() {
        assert_eq!(clamp_limit(Some(0), 10, 50), 1);
    }

    #[test]
    fn oversized_limit_clamps_to_the_maximum() {
        assert_eq!(clamp_limit(Some(1_000), 10, 50), 50);
    }

    #[test]
    fn in_range_limit_passes_through() {
        assert_eq!(clamp_limit(Some(25), 10, 50), 25);
    }
}
