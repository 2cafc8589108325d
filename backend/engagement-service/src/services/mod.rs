pub mod leaderboard;
pub mod scoring;
pub mod weekly_best;

pub use leaderboard::LeaderboardService;
pub use scoring::WeeklyWeights;
pub use weekly_best::WeeklyBestService;
