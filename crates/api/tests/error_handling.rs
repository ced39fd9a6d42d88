//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly; no router or database involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use folio_api::error::AppError;
use folio_core::error::{ConflictReason, CoreError, FormError};
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::not_found("Project", "missing-slug"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["ok"], false);
    assert_eq!(json["code"], "not_found");
    assert_eq!(json["error"], "Project 'missing-slug' not found");
}

#[tokio::test]
async fn form_errors_keep_their_codes() {
    let (status, json) = error_to_response(FormError::InvalidEmail.into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "invalid_email");

    let (status, json) = error_to_response(FormError::BadReactionKind.into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "bad_kind");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("Missing slug".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "bad_request");
    assert_eq!(json["error"], "Missing slug");
}

#[tokio::test]
async fn conflict_error_returns_409_with_reason_code() {
    let err = AppError::Core(CoreError::conflict(
        ConflictReason::CategoryInUse,
        "Category is used by 2 project(s)",
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "category_in_use");
    assert_eq!(json["error"], "Category is used by 2 project(s)");
}

#[tokio::test]
async fn rate_limited_returns_429() {
    let (status, json) = error_to_response(AppError::Core(CoreError::RateLimited)).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["code"], "rate_limited");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("connection string with password".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "internal_error");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "not_found");
}

#[tokio::test]
async fn verbose_persistence_error_exposes_diagnostics() {
    let err = AppError::Persistence {
        source: sqlx::Error::PoolTimedOut,
        verbose: true,
    };

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Internal error");
    assert_eq!(json["name"], "PoolTimedOut");
    assert!(json["message"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn quiet_persistence_error_is_sanitized() {
    let err = AppError::Persistence {
        source: sqlx::Error::PoolTimedOut,
        verbose: false,
    };

    let (_, json) = error_to_response(err).await;

    assert_eq!(json["error"], "An internal error occurred");
    assert!(json.get("message").is_none());
}
