use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    /// Duration of board computations by board (weekly, resources, leaderboard).
    pub static ref BOARD_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "engagement_board_duration_seconds",
        "Board computation duration segmented by board",
        &["board"]
    )
    .expect("failed to register engagement_board_duration_seconds");

    /// Total board requests by board and outcome (ok, degraded, error).
    pub static ref BOARD_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "engagement_board_request_total",
        "Board requests segmented by board and outcome",
        &["board", "outcome"]
    )
    .expect("failed to register engagement_board_request_total");

    /// Candidates ranked per board computation, segmented by kind.
    pub static ref RANKED_CANDIDATE_COUNT: HistogramVec = register_histogram_vec!(
        "engagement_ranked_candidate_count",
        "Number of candidates ranked segmented by kind",
        &["kind"]
    )
    .expect("failed to register engagement_ranked_candidate_count");

    /// Engagement events recorded, segmented by event type.
    pub static ref ENGAGEMENT_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "engagement_events_total",
        "Engagement events recorded segmented by event type",
        &["event"]
    )
    .expect("failed to register engagement_events_total");

    /// Requests rejected by the rate limiter, segmented by route.
    pub static ref RATE_LIMITED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "engagement_rate_limited_total",
        "Requests rejected by the rate limiter segmented by route",
        &["route"]
    )
    .expect("failed to register engagement_rate_limited_total");
}
