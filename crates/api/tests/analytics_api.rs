//! HTTP integration tests for the admin analytics report and CSV export.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, body_text, build_test_app, get_admin, post_json_with, seed_project};
use folio_core::content::ProjectStatus;
use folio_core::export::VIEWS_CSV_HEADER;
use serde_json::json;
use sqlx::PgPool;

const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
const MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15";

/// Two mobile views and one desktop view of `test-1`, from three visitors.
async fn seed_views(pool: &PgPool) -> i64 {
    let project_id = seed_project(pool, "test-1", ProjectStatus::Completed).await;
    let app = build_test_app(pool.clone());

    for (visitor, agent) in [("v1", IPHONE), ("v2", IPHONE), ("v3", MAC)] {
        let response = post_json_with(
            app.clone(),
            "/api/track-view",
            json!({ "slug": "test-1", "visitorId": visitor }),
            &[("user-agent", agent)],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    project_id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_end_to_end(pool: PgPool) {
    let project_id = seed_views(&pool).await;

    let response = get_admin(build_test_app(pool), "/api/admin/analytics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await["data"].clone();

    assert_eq!(report["total_views"], 3);
    assert_eq!(report["unique_visitors"], 3);
    assert_eq!(report["recent_views"].as_array().unwrap().len(), 3);
    assert_eq!(report["recent_views"][0]["project_slug"], "test-1");

    assert_eq!(
        report["devices"],
        json!({
            "buckets": [
                { "label": "mobile", "count": 2 },
                { "label": "desktop", "count": 1 },
            ],
            "max": 2,
        })
    );
    assert_eq!(report["referrers"]["buckets"], json!([{ "label": "direct", "count": 3 }]));

    // Default window: the last 30 days plus today, oldest first.
    let daily = report["daily"].as_array().unwrap();
    assert_eq!(daily.len(), 31);
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(daily[30], json!({ "date": today, "count": 3 }));
    assert!(daily[..30].iter().all(|bucket| bucket["count"] == 0));

    assert_eq!(
        report["reactions"][project_id.to_string()],
        json!({ "likes": 0, "dislikes": 0 })
    );
    assert_eq!(report["contact_clicks"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_respects_window(pool: PgPool) {
    seed_views(&pool).await;

    let response = get_admin(
        build_test_app(pool),
        "/api/admin/analytics?start=2024-01-01&end=2024-01-03",
    )
    .await;
    let report = body_json(response).await["data"].clone();

    assert_eq!(report["range"], json!({ "start": "2024-01-01", "end": "2024-01-03" }));
    assert_eq!(
        report["daily"],
        json!([
            { "date": "2024-01-01", "count": 0 },
            { "date": "2024-01-02", "count": 0 },
            { "date": "2024-01-03", "count": 0 },
        ])
    );
    assert_eq!(report["devices"], json!({ "buckets": [], "max": 0 }));
    // All-time figures ignore the window.
    assert_eq!(report["total_views"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_clamps_long_ranges(pool: PgPool) {
    let response = get_admin(
        build_test_app(pool),
        "/api/admin/analytics?start=2020-01-01&end=2024-12-31",
    )
    .await;
    let report = body_json(response).await["data"].clone();

    assert_eq!(report["daily"].as_array().unwrap().len(), 91);
    assert_eq!(report["range"]["end"], "2024-12-31");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_far_future_end_date_is_served(pool: PgPool) {
    seed_views(&pool).await;
    let app = build_test_app(pool);

    let response = get_admin(app.clone(), "/api/admin/analytics/export?end=%2B262142-12-31").await;
    assert_eq!(response.status(), StatusCode::OK);
    let csv = body_text(response).await;
    assert_eq!(csv.lines().collect::<Vec<_>>(), vec![VIEWS_CSV_HEADER]);

    let response = get_admin(app, "/api/admin/analytics?end=%2B262142-12-31").await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await["data"].clone();
    assert_eq!(report["daily"].as_array().unwrap().len(), 31);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_csv_export(pool: PgPool) {
    seed_views(&pool).await;

    let response = get_admin(build_test_app(pool), "/api/admin/analytics/export").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers().get(CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=analytics.csv"
    );

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], VIEWS_CSV_HEADER);
    assert_eq!(lines.len(), 4);
    assert!(lines[1..]
        .iter()
        .all(|line| line.contains(",test-1,\"/projects/test-1\",\"\",")));
    assert!(lines[1].ends_with("\"desktop\""), "newest view first");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_csv_export_empty_window(pool: PgPool) {
    seed_views(&pool).await;

    let response = get_admin(
        build_test_app(pool),
        "/api/admin/analytics/export?start=2024-01-01&end=2024-01-02",
    )
    .await;

    assert_eq!(body_text(response).await, VIEWS_CSV_HEADER);
}
