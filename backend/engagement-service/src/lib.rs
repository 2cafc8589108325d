/// Engagement Service Library
///
/// Computes engagement scores and rankings for the Agora community platform:
/// weekly best content, all-time popular resources, and member leaderboards.
/// Counter snapshots are synced in by the content collaborators; persistence,
/// auth, and delivery stay with those collaborators.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers for boards, content, members, health
/// - `models`: Counter snapshots, engagement events, scored items
/// - `services`: Scoring formulas, ranking, weekly best, leaderboard
/// - `store`: The content store boundary and the in-memory reference store
/// - `middleware`: Request throttling
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
