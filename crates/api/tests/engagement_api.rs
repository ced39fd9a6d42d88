//! HTTP integration tests for reactions, rate limiting, subscriptions and
//! the public content reads.

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{
    body_json, build_test_app, get, issued_visitor, post_json, post_json_with, seed_project,
};
use folio_core::content::ProjectStatus;
use folio_core::rate_limit::{REACTIONS, SUBSCRIBE};
use folio_db::repositories::SubscriberRepo;
use serde_json::json;
use sqlx::PgPool;

fn visitor_cookie(id: &str) -> String {
    format!("folio_vid={id}")
}

/// Fill the client's current and next window so the next request is over
/// the limit even if a window boundary passes mid-test.
async fn exhaust(pool: &PgPool, rule: &folio_core::rate_limit::RateLimitRule, client: &str) {
    let window = rule.window_index(Utc::now().timestamp());
    for index in [window, window + 1] {
        let expires_at = DateTime::<Utc>::from_timestamp(rule.window_end(index), 0).unwrap();
        sqlx::query(
            "INSERT INTO rate_limit_windows (key, window_index, hits, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(rule.key(client))
        .bind(index)
        .bind(rule.limit)
        .bind(expires_at)
        .execute(pool)
        .await
        .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Reactions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reaction_unknown_project(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/projects/nope/reaction").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_reaction_read_issues_visitor(pool: PgPool) {
    seed_project(&pool, "test-1", ProjectStatus::Completed).await;

    let response = get(build_test_app(pool), "/api/projects/test-1/reaction").await;

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!set_cookie.contains("Secure"));

    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({ "ok": true, "likeCount": 0, "dislikeCount": 0, "mine": null })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reaction_switches_kind(pool: PgPool) {
    seed_project(&pool, "test-1", ProjectStatus::Completed).await;
    let app = build_test_app(pool);

    let first = post_json(app.clone(), "/api/projects/test-1/reaction", json!({ "kind": "like" })).await;
    assert_eq!(first.status(), StatusCode::OK);
    let visitor = issued_visitor(&first).unwrap();
    let json = body_json(first).await;
    assert_eq!(json["likeCount"], 1);
    assert_eq!(json["mine"], "like");

    let cookie = visitor_cookie(&visitor);
    let second = post_json_with(
        app.clone(),
        "/api/projects/test-1/reaction",
        json!({ "kind": "dislike" }),
        &[("cookie", cookie.as_str())],
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    assert!(issued_visitor(&second).is_none(), "known visitors keep their cookie");
    let json = body_json(second).await;
    assert_eq!(json["likeCount"], 0);
    assert_eq!(json["dislikeCount"], 1);
    assert_eq!(json["mine"], "dislike");

    // Re-submitting the same kind leaves it set.
    let third = post_json_with(
        app.clone(),
        "/api/projects/test-1/reaction",
        json!({ "kind": "dislike" }),
        &[("cookie", cookie.as_str())],
    )
    .await;
    let json = body_json(third).await;
    assert_eq!(json["dislikeCount"], 1);
    assert_eq!(json["mine"], "dislike");

    // The read endpoint sees the same state for this visitor.
    let request = axum::http::Request::builder()
        .uri("/api/projects/test-1/reaction")
        .header("cookie", &cookie)
        .body(axum::body::Body::empty())
        .unwrap();
    let json = body_json(common::send(app, request).await).await;
    assert_eq!(json["mine"], "dislike");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reaction_rejects_unknown_kind(pool: PgPool) {
    seed_project(&pool, "test-1", ProjectStatus::Completed).await;

    let response = post_json(
        build_test_app(pool),
        "/api/projects/test-1/reaction",
        json!({ "kind": "love" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "bad_kind");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reaction_rate_limit(pool: PgPool) {
    seed_project(&pool, "test-1", ProjectStatus::Completed).await;
    exhaust(&pool, &REACTIONS, "203.0.113.9").await;
    let app = build_test_app(pool);

    let limited = post_json_with(
        app.clone(),
        "/api/projects/test-1/reaction",
        json!({ "kind": "like" }),
        &[("x-forwarded-for", "203.0.113.9, 10.0.0.1")],
    )
    .await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(limited).await["code"], "rate_limited");

    // Other clients are unaffected.
    let other = post_json_with(
        app,
        "/api/projects/test-1/reaction",
        json!({ "kind": "like" }),
        &[("x-forwarded-for", "198.51.100.7")],
    )
    .await;
    assert_eq!(other.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reaction_limit_counts_requests(pool: PgPool) {
    seed_project(&pool, "test-1", ProjectStatus::Completed).await;
    let app = build_test_app(pool.clone());

    for _ in 0..3 {
        let response = post_json_with(
            app.clone(),
            "/api/projects/test-1/reaction",
            json!({ "kind": "like" }),
            &[("x-real-ip", "192.0.2.44")],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let hits: i64 = sqlx::query_scalar("SELECT SUM(hits)::BIGINT FROM rate_limit_windows WHERE key = $1")
        .bind(REACTIONS.key("192.0.2.44"))
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(hits, 3);
}

// ---------------------------------------------------------------------------
// Subscribe
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subscribe_normalizes_and_is_idempotent(pool: PgPool) {
    let app = build_test_app(pool.clone());

    for email in ["  Reader@Example.COM ", "reader@example.com"] {
        let response = post_json(app.clone(), "/api/subscribe", json!({ "email": email })).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "ok": true }));
    }

    let found = SubscriberRepo::find_by_email(&pool, "reader@example.com")
        .await
        .unwrap();
    assert!(found.is_some());
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM newsletter_subscribers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subscribe_rejects_bad_email(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/subscribe",
        json!({ "email": "not-an-email" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "invalid_email");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subscribe_rate_limit(pool: PgPool) {
    exhaust(&pool, &SUBSCRIBE, "unknown").await;

    let response = post_json(
        build_test_app(pool),
        "/api/subscribe",
        json!({ "email": "reader@example.com" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

// ---------------------------------------------------------------------------
// Public reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_reads(pool: PgPool) {
    seed_project(&pool, "alpha", ProjectStatus::Completed).await;
    seed_project(&pool, "beta", ProjectStatus::InProgress).await;
    let app = build_test_app(pool);

    let list = body_json(get(app.clone(), "/api/projects").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 2);

    let one = get(app.clone(), "/api/projects/beta").await;
    assert_eq!(one.status(), StatusCode::OK);
    let json = body_json(one).await;
    assert_eq!(json["data"]["slug"], "beta");
    assert_eq!(json["data"]["status"], "In Progress");

    let missing = get(app, "/api/projects/gamma").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search(pool: PgPool) {
    seed_project(&pool, "alpha", ProjectStatus::Completed).await;
    let app = build_test_app(pool);

    let short = body_json(get(app.clone(), "/api/search?q=a").await).await;
    assert_eq!(short, json!([]));

    let by_text = body_json(get(app.clone(), "/api/search?q=ABOUT%20alp").await).await;
    assert_eq!(by_text.as_array().unwrap().len(), 1);
    assert_eq!(by_text[0]["slug"], "alpha");

    let by_tag = body_json(get(app.clone(), "/api/search?q=Finance").await).await;
    assert_eq!(by_tag.as_array().unwrap().len(), 1);

    let none = body_json(get(app, "/api/search?q=zzz").await).await;
    assert_eq!(none, json!([]));
}
