/// Configuration management for the engagement service
///
/// This module handles loading configuration from environment variables,
/// with per-field defaults and production validations.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use rate_limit::RateLimiterConfig;
use resilience::RetryPolicy;

use crate::services::leaderboard::PointWeights;
use crate::services::scoring::WeeklyWeights;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Weekly ranking configuration
    pub ranking: RankingConfig,
    /// Leaderboard configuration
    pub leaderboard: LeaderboardSettings,
    /// Store retry configuration
    pub store: StoreConfig,
    /// Rate limiting configuration
    pub rate_limit: RateLimitSettings,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Weekly ranking configuration (window, limits, formula weights)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub window_days: i64,
    pub default_limit: usize,
    pub max_limit: usize,
    pub view_weight: f64,
    pub vote_weight: f64,
    pub comment_weight: f64,
    pub bookmark_weight: f64,
}

/// Leaderboard configuration (limits, point weights)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardSettings {
    pub default_limit: usize,
    pub max_limit: usize,
    pub post_weight: f64,
    pub comment_weight: f64,
    pub vote_weight: f64,
    pub bookmark_weight: f64,
}

/// Store retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_store_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub per_second: f64,
    pub burst: u32,
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("ENGAGEMENT_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("ENGAGEMENT_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8085),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            ranking: RankingConfig {
                window_days: std::env::var("RANKING_WINDOW_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(7),
                default_limit: std::env::var("RANKING_DEFAULT_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
                max_limit: std::env::var("RANKING_MAX_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(50),
                view_weight: parse_env_or_default("RANKING_VIEW_WEIGHT", 1.0)?,
                vote_weight: parse_env_or_default("RANKING_VOTE_WEIGHT", 10.0)?,
                comment_weight: parse_env_or_default("RANKING_COMMENT_WEIGHT", 5.0)?,
                bookmark_weight: parse_env_or_default("RANKING_BOOKMARK_WEIGHT", 5.0)?,
            },
            leaderboard: LeaderboardSettings {
                default_limit: std::env::var("LEADERBOARD_DEFAULT_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(25),
                max_limit: std::env::var("LEADERBOARD_MAX_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(100),
                post_weight: parse_env_or_default("LEADERBOARD_POST_WEIGHT", 10.0)?,
                comment_weight: parse_env_or_default("LEADERBOARD_COMMENT_WEIGHT", 5.0)?,
                vote_weight: parse_env_or_default("LEADERBOARD_VOTE_WEIGHT", 2.0)?,
                bookmark_weight: parse_env_or_default("LEADERBOARD_BOOKMARK_WEIGHT", 3.0)?,
            },
            store: StoreConfig {
                retry_attempts: std::env::var("STORE_RETRY_ATTEMPTS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_store_retry_attempts),
                retry_backoff_ms: std::env::var("STORE_RETRY_BACKOFF_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_store_retry_backoff_ms),
            },
            rate_limit: RateLimitSettings {
                enabled: std::env::var("RATE_LIMIT_ENABLED")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(true),
                per_second: parse_env_or_default("RATE_LIMIT_PER_SECOND", 10.0)?,
                burst: std::env::var("RATE_LIMIT_BURST")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(20),
                idle_ttl_secs: std::env::var("RATE_LIMIT_IDLE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
                sweep_interval_secs: std::env::var("RATE_LIMIT_SWEEP_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            },
        })
    }
}

impl RankingConfig {
    pub fn weekly_weights(&self) -> WeeklyWeights {
        WeeklyWeights {
            views: self.view_weight,
            votes: self.vote_weight,
            comments: self.comment_weight,
            bookmarks: self.bookmark_weight,
        }
    }
}

impl LeaderboardSettings {
    pub fn point_weights(&self) -> PointWeights {
        PointWeights {
            posts_created: self.post_weight,
            comments_written: self.comment_weight,
            votes_received: self.vote_weight,
            bookmarks_received: self.bookmark_weight,
        }
    }
}

impl StoreConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts,
            initial_backoff: Duration::from_millis(self.retry_backoff_ms),
            ..RetryPolicy::default()
        }
    }
}

impl RateLimitSettings {
    pub fn limiter_config(&self) -> RateLimiterConfig {
        RateLimiterConfig {
            per_second: self.per_second,
            burst: self.burst,
            idle_ttl: Duration::from_secs(self.idle_ttl_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
        }
    }
}

fn parse_env_or_default(key: &str, default: f64) -> Result<f64, String> {
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

fn default_store_retry_attempts() -> u32 {
    3
}

fn default_store_retry_backoff_ms() -> u64 {
    100
}
