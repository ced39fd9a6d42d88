//! HTTP integration tests for view and outbound-click tracking.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, issued_visitor, post_json, post_json_with, seed_project};
use folio_core::content::ProjectStatus;
use folio_db::repositories::{ContactClickRepo, ProjectViewRepo};
use serde_json::json;
use sqlx::PgPool;

const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_view_requires_slug(pool: PgPool) {
    let response = post_json(build_test_app(pool), "/api/track-view", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["code"], "bad_request");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_view_unknown_project(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/track-view",
        json!({ "slug": "nope" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "not_found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_view_rejects_malformed_json(pool: PgPool) {
    let response = post_json_with(
        build_test_app(pool),
        "/api/track-view",
        json!("not an object"),
        &[],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_view_records_row(pool: PgPool) {
    seed_project(&pool, "test-1", ProjectStatus::Completed).await;

    let response = post_json_with(
        build_test_app(pool.clone()),
        "/api/track-view",
        json!({ "slug": "test-1" }),
        &[("user-agent", IPHONE), ("referer", "https://news.example.com/item")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let visitor = issued_visitor(&response).expect("first view issues a visitor cookie");
    assert_eq!(body_json(response).await, json!({ "ok": true }));

    let (path, referrer, device, visitor_id): (String, Option<String>, String, Option<String>) =
        sqlx::query_as(
            "SELECT path, referrer, device_type, visitor_id FROM project_views",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(path, "/projects/test-1");
    assert_eq!(referrer.as_deref(), Some("https://news.example.com/item"));
    assert_eq!(device, "mobile");
    assert_eq!(visitor_id, Some(visitor));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_view_prefers_body_fields(pool: PgPool) {
    seed_project(&pool, "test-1", ProjectStatus::Completed).await;

    let response = post_json_with(
        build_test_app(pool.clone()),
        "/api/track-view",
        json!({
            "slug": "test-1",
            "path": "/projects/test-1?tab=results",
            "visitorId": "client-visitor",
            "referrer": "https://www.google.com/",
        }),
        &[("referer", "https://ignored.example/")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (path, referrer, device, visitor_id): (String, Option<String>, String, Option<String>) =
        sqlx::query_as(
            "SELECT path, referrer, device_type, visitor_id FROM project_views",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(path, "/projects/test-1?tab=results");
    assert_eq!(referrer.as_deref(), Some("https://www.google.com/"));
    assert_eq!(device, "unknown");
    assert_eq!(visitor_id.as_deref(), Some("client-visitor"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_view_never_deduplicates(pool: PgPool) {
    seed_project(&pool, "test-1", ProjectStatus::Completed).await;

    for _ in 0..3 {
        let response = post_json(
            build_test_app(pool.clone()),
            "/api/track-view",
            json!({ "slug": "test-1", "visitorId": "same" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(ProjectViewRepo::count_all(&pool).await.unwrap(), 3);
    assert_eq!(ProjectViewRepo::count_unique_visitors(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_outbound(pool: PgPool) {
    let missing = post_json(build_test_app(pool.clone()), "/api/track/outbound", json!({})).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/track/outbound",
        json!({ "href": "mailto:owner@example.dev" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let counts = ContactClickRepo::counts_by_href(&pool).await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].href, "mailto:owner@example.dev");
    assert_eq!(counts[0].count, 1);
}
