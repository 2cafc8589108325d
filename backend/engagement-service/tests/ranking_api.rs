use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

use engagement_service::handlers::{
    self, boards::BoardState, content::ContentState, health::HealthState,
};
use engagement_service::models::{ContentKind, ScorableItem};
use engagement_service::services::leaderboard::{LeaderboardConfig, LeaderboardService};
use engagement_service::services::weekly_best::{WeeklyBestConfig, WeeklyBestService};
use engagement_service::store::{ContentStore, InMemoryStore};
use resilience::{AsyncState, CircuitBreaker, CircuitBreakerConfig};

struct TestHarness {
    store: Arc<InMemoryStore>,
    board_state: web::Data<BoardState>,
    content_state: web::Data<ContentState>,
    health_state: web::Data<HealthState>,
}

fn harness() -> TestHarness {
    let store = Arc::new(InMemoryStore::new());
    let shared: Arc<dyn ContentStore> = store.clone();
    let breaker = CircuitBreaker::new(CircuitBreakerConfig::default());

    let weekly = Arc::new(WeeklyBestService::new(
        shared.clone(),
        WeeklyBestConfig::default(),
    ));
    let leaderboard = Arc::new(LeaderboardService::new(
        shared.clone(),
        LeaderboardConfig::default(),
    ));

    TestHarness {
        store,
        board_state: web::Data::new(BoardState {
            weekly,
            leaderboard,
            breaker: breaker.clone(),
            max_board_limit: 50,
            max_leaderboard_limit: 100,
        }),
        content_state: web::Data::new(ContentState {
            store: shared.clone(),
        }),
        health_state: web::Data::new(HealthState {
            store: shared,
            store_probe: AsyncState::new(),
            probe_policy: resilience::RetryPolicy::no_retries(),
            limiter: Arc::new(rate_limit::RateLimiter::new(Default::default())),
            breaker,
        }),
    }
}

fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/health", web::get().to(handlers::health_summary))
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
        );
}

fn create_item(id: &str, kind: ContentKind, age_days: i64) -> ScorableItem {
    ScorableItem {
        id: id.to_string(),
        kind,
        view_count: 0,
        vote_count: 0,
        comment_count: 0,
        bookmark_count: 0,
        ratings: Vec::new(),
        created_at: Utc::now() - Duration::days(age_days),
    }
}

macro_rules! init_app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data($harness.board_state.clone())
                .app_data($harness.content_state.clone())
                .app_data($harness.health_state.clone())
                .configure(api_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn weekly_best_ranks_recent_content() {
    let h = harness();
    let mut strong = create_item("res-strong", ContentKind::Resource, 1);
    strong.vote_count = 5;
    let mut steady = create_item("res-steady", ContentKind::Resource, 2);
    steady.view_count = 30;
    let mut stale = create_item("res-stale", ContentKind::Resource, 30);
    stale.vote_count = 100;
    let mut post = create_item("post-1", ContentKind::Post, 1);
    post.comment_count = 2;
    for item in [strong, steady, stale, post] {
        h.store.upsert_item(item).await.unwrap();
    }
    let app = init_app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/best/weekly?limit=10")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let resources = body["best_resources"].as_array().unwrap();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0]["id"], "res-strong");
    assert_eq!(resources[0]["score"], 50.0);
    assert_eq!(resources[1]["id"], "res-steady");
    assert_eq!(resources[1]["score"], 30.0);

    let posts = body["best_posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["score"], 10.0);

    assert_eq!(body["stats"]["resource_candidates"], 2);
    assert_eq!(body["stats"]["post_candidates"], 1);
    assert_eq!(body["stats"]["window_days"], 7);
}

#[actix_web::test]
async fn weekly_best_applies_the_limit() {
    let h = harness();
    for i in 0..5 {
        let mut item = create_item(&format!("res-{}", i), ContentKind::Resource, 1);
        item.vote_count = i;
        h.store.upsert_item(item).await.unwrap();
    }
    let app = init_app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/best/weekly?limit=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["best_resources"].as_array().unwrap().len(), 2);
    // the limit trims the output, not the candidate stats
    assert_eq!(body["stats"]["resource_candidates"], 5);
}

#[actix_web::test]
async fn popular_resources_use_bookmarks_and_ratings() {
    let h = harness();
    let mut resource = create_item("res-1", ContentKind::Resource, 200);
    resource.bookmark_count = 3;
    resource.ratings = vec![4.0, 5.0];
    h.store.upsert_item(resource).await.unwrap();
    let app = init_app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/best/resources")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let resources = body["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["id"], "res-1");
    assert_eq!(resources[0]["score"], 15.0);
}

#[actix_web::test]
async fn content_roundtrip_carries_the_primary_score() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::put()
        .uri("/api/v1/content/post-1")
        .set_json(json!({
            "kind": "post",
            "vote_count": 2,
            "comment_count": 3,
            "created_at": Utc::now().to_rfc3339(),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get()
        .uri("/api/v1/content/post-1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], "post-1");
    assert_eq!(body["kind"], "post");
    // 2 * 2 + 3 * 3
    assert_eq!(body["score"], 13.0);
}

#[actix_web::test]
async fn engagement_events_move_the_score() {
    let h = harness();
    h.store
        .upsert_item(create_item("res-1", ContentKind::Resource, 1))
        .await
        .unwrap();
    let app = init_app!(h);

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/v1/content/res-1/engagement")
            .set_json(json!({"event": "bookmark"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
    for value in [4.0, 5.0] {
        let req = test::TestRequest::post()
            .uri("/api/v1/content/res-1/engagement")
            .set_json(json!({"event": "rating", "value": value}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["event_id"].is_string());
        assert_eq!(body["item"]["id"], "res-1");
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/content/res-1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["score"], 15.0);
}

#[actix_web::test]
async fn out_of_range_rating_event_is_rejected() {
    let h = harness();
    h.store
        .upsert_item(create_item("res-1", ContentKind::Resource, 1))
        .await
        .unwrap();
    let app = init_app!(h);

    let req = test::TestRequest::post()
        .uri("/api/v1/content/res-1/engagement")
        .set_json(json!({"event": "rating", "value": 9.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
}

#[actix_web::test]
async fn snapshot_with_out_of_range_ratings_is_rejected() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::put()
        .uri("/api/v1/content/res-1")
        .set_json(json!({
            "kind": "resource",
            "ratings": [7.0],
            "created_at": Utc::now().to_rfc3339(),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn unknown_content_is_not_found() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::get()
        .uri("/api/v1/content/ghost")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::post()
        .uri("/api/v1/content/ghost/engagement")
        .set_json(json!({"event": "view"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[actix_web::test]
async fn leaderboard_returns_ranked_members() {
    let h = harness();
    let app = init_app!(h);

    for (id, name, posts, comments) in [
        ("alice", "Alice", 1i64, 0i64),
        ("bob", "Bob", 0, 30),
        ("carol", "Carol", 12, 4),
    ] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/members/{}", id))
            .set_json(json!({
                "display_name": name,
                "posts_created": posts,
                "comments_written": comments,
                "joined_at": Utc::now().to_rfc3339(),
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/leaderboard?limit=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["member_id"], "bob");
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["points"], 150.0);
    assert_eq!(entries[0]["level"], 2);
    assert_eq!(entries[1]["member_id"], "carol");
    assert_eq!(entries[1]["points"], 140.0);
    assert_eq!(body["member_count"], 3);
}

#[actix_web::test]
async fn empty_member_name_is_rejected() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::put()
        .uri("/api/v1/members/alice")
        .set_json(json!({
            "display_name": "",
            "joined_at": Utc::now().to_rfc3339(),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn health_endpoints_report_ok() {
    let h = harness();
    let app = init_app!(h);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "engagement-service");

    let req = test::TestRequest::get()
        .uri("/api/v1/health/ready")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["checks"]["store"]["status"], "healthy");
    assert_eq!(body["checks"]["store"]["phase"], "success");

    let req = test::TestRequest::get()
        .uri("/api/v1/health/live")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["alive"], true);
}
