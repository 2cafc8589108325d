use actix_cors::Cors;
use actix_web::{
    middleware::{Condition, Logger},
    web, App, HttpServer,
};
use std::io;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use engagement_service::handlers::{
    self, boards::BoardState, content::ContentState, health::HealthState,
};
use engagement_service::middleware::RateLimitMiddleware;
use engagement_service::services::leaderboard::{LeaderboardConfig, LeaderboardService};
use engagement_service::services::weekly_best::{WeeklyBestConfig, WeeklyBestService};
use engagement_service::store::{ContentStore, InMemoryStore};
use rate_limit::RateLimiter;
use resilience::{AsyncState, CircuitBreaker, CircuitBreakerConfig};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

/// Engagement Service
///
/// Ranks community content and members from synced counter snapshots.
///
/// # Routes
///
/// - `/api/v1/best/*` - Weekly best boards and all-time popular resources
/// - `/api/v1/leaderboard` - Member leaderboard with points and levels
/// - `/api/v1/content/*` - Counter snapshot sync and engagement events
/// - `/api/v1/members/*` - Member activity sync
///
/// # Deployment
///
/// Engagement-service runs on port 8085 (configurable via
/// ENGAGEMENT_SERVICE_PORT env var). Counters arrive from the content
/// collaborators; no database of its own.
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match engagement_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting engagement-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let store: Arc<dyn ContentStore> = Arc::new(InMemoryStore::new());

    let limiter = Arc::new(RateLimiter::new(config.rate_limit.limiter_config()));
    let breaker = CircuitBreaker::new(CircuitBreakerConfig::default());

    let weekly = Arc::new(WeeklyBestService::new(
        store.clone(),
        WeeklyBestConfig {
            window_days: config.ranking.window_days,
            default_limit: config.ranking.default_limit,
            weights: config.ranking.weekly_weights(),
            retry: config.store.retry_policy(),
        },
    ));
    let leaderboard = Arc::new(LeaderboardService::new(
        store.clone(),
        LeaderboardConfig {
            default_limit: config.leaderboard.default_limit,
            weights: config.leaderboard.point_weights(),
            retry: config.store.retry_policy(),
        },
    ));

    let board_state = web::Data::new(BoardState {
        weekly: weekly.clone(),
        leaderboard: leaderboard.clone(),
        breaker: breaker.clone(),
        max_board_limit: config.ranking.max_limit,
        max_leaderboard_limit: config.leaderboard.max_limit,
    });
    let content_state = web::Data::new(ContentState {
        store: store.clone(),
    });
    let health_state = web::Data::new(HealthState {
        store: store.clone(),
        store_probe: AsyncState::new(),
        probe_policy: config.store.retry_policy(),
        limiter: limiter.clone(),
        breaker: breaker.clone(),
    });

    let rate_limit_enabled = config.rate_limit.enabled;
    let rate_limit_middleware = RateLimitMiddleware::new(limiter.clone());

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        // Build CORS configuration
        let cors_builder = Cors::default();
        let mut cors = cors_builder;
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(board_state.clone())
            .app_data(content_state.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(engagement_service::metrics::serve_metrics),
            )
            // Health check endpoints
            .route("/api/v1/health", web::get().to(handlers::health_summary))
            .route(
                "/api/v1/health/ready",
                web::get().to(handlers::readiness_summary),
            )
            .route(
                "/api/v1/health/live",
                web::get().to(handlers::liveness_check),
            )
            .service(
                web::scope("/api/v1")
                    .wrap(Condition::new(
                        rate_limit_enabled,
                        rate_limit_middleware.clone(),
                    ))
                    .service(
                        web::scope("/best")
                            .route("/weekly", web::get().to(handlers::get_weekly_best))
                            .route(
                                "/resources",
                                web::get().to(handlers::get_popular_resources),
                            ),
                    )
                    .route("/leaderboard", web::get().to(handlers::get_leaderboard))
                    .service(
                        web::scope("/content")
                            .service(
                                web::resource("/{content_id}")
                                    .route(web::put().to(handlers::upsert_content))
                                    .route(web::get().to(handlers::get_content)),
                            )
                            .route(
                                "/{content_id}/engagement",
                                web::post().to(handlers::record_engagement),
                            ),
                    )
                    .route(
                        "/members/{member_id}",
                        web::put().to(handlers::upsert_member),
                    ),
            )
    })
    .bind(&bind_address)?
    .workers(4)
    .run();

    let server_handle = server.handle();

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let mut sweeper_shutdown = shutdown_tx.subscribe();

    let mut tasks: JoinSet<io::Result<()>> = JoinSet::new();

    // HTTP server task
    tasks.spawn(async move {
        tracing::info!("HTTP server is running");
        server.await
    });

    // Rate limiter eviction sweeper
    let sweeper = limiter.clone();
    tasks.spawn(async move {
        tokio::select! {
            _ = sweeper.run_sweeper() => {}
            _ = sweeper_shutdown.recv() => {
                tracing::info!("Rate limiter sweeper stopping");
            }
        }
        Ok(())
    });

    let mut first_error: Option<io::Error> = None;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = tasks.join_next() => {
                match result {
                    Some(Ok(Ok(_))) => {
                        tracing::info!("Background task completed");
                    }
                    Some(Ok(Err(e))) => {
                        tracing::error!("Task returned error: {}", e);
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                        let _ = shutdown_tx.send(());
                        server_handle.stop(true).await;
                        tasks.shutdown().await;
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::error!("Task join error: {}", e);
                        if first_error.is_none() {
                            first_error = Some(io::Error::new(io::ErrorKind::Other, e.to_string()));
                        }
                        let _ = shutdown_tx.send(());
                        server_handle.stop(true).await;
                        tasks.shutdown().await;
                        break;
                    }
                    None => break,
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(());
                server_handle.stop(true).await;
                tasks.shutdown().await;
                break;
            }
        }
    }

    tracing::info!("Engagement-service shutting down");

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
