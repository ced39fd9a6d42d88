#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use folio_api::auth::jwt::{generate_admin_token, JwtConfig};
use folio_api::config::{
    AdminConfig, AnalyticsConfig, AppEnv, RateLimitBackend, ServerConfig,
};
use folio_api::rate_limit::PgRateLimiter;
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_core::content::ProjectStatus;
use folio_core::feed::SiteInfo;
use folio_core::types::DbId;
use folio_db::models::project::ProjectInput;
use folio_db::repositories::ProjectRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "owner@example.dev";

/// Build a test `ServerConfig` with safe defaults.
///
/// Rate limiting runs against the real counter table so the limits can be
/// exercised end to end.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        env: AppEnv::Development,
        site: SiteInfo {
            base_url: "https://folio.test".to_string(),
            title: "Folio".to_string(),
            description: "Test portfolio".to_string(),
            language: "en".to_string(),
        },
        admin: AdminConfig {
            jwt: JwtConfig {
                secret: "test-secret-for-integration-tests".to_string(),
                token_expiry_mins: 60,
            },
            allowed_emails: vec![ADMIN_EMAIL.to_string()],
            sign_in_url: "/api/auth/signin".to_string(),
        },
        analytics: AnalyticsConfig {
            max_range_days: 90,
            default_range_days: 30,
        },
        rate_limit_backend: RateLimitBackend::Postgres,
        visitor_cookie_secure: false,
    }
}

pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        rate_limiter: Arc::new(PgRateLimiter::new(pool.clone())),
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A valid admin token for [`ADMIN_EMAIL`].
pub fn admin_token() -> String {
    token_for(ADMIN_EMAIL)
}

pub fn token_for(email: &str) -> String {
    generate_admin_token(email, &test_config().admin.jwt).unwrap()
}

pub async fn seed_project(pool: &PgPool, slug: &str, status: ProjectStatus) -> DbId {
    let input = ProjectInput {
        slug: slug.to_string(),
        title: format!("Project {slug}"),
        subtitle: None,
        description: format!("About {slug}"),
        content: None,
        status,
        year: 2024,
        tags: vec!["finance".to_string()],
        tech_stack: vec![],
        category_id: None,
        sort_order: 999,
        featured: false,
        github_url: None,
        live_url: None,
        cover_image_url: None,
    };
    ProjectRepo::create(pool, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// GET with an admin bearer token.
pub async fn get_admin(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", admin_token()))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_json_with(app, uri, body, &[]).await
}

pub async fn post_json_with(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// Form POST, optionally as an admin and optionally asking for JSON.
pub async fn post_form(
    app: Router,
    uri: &str,
    form: &str,
    token: Option<&str>,
    want_json: bool,
) -> Response<Body> {
    post_body(
        app,
        uri,
        "application/x-www-form-urlencoded",
        form.as_bytes().to_vec(),
        token,
        want_json,
    )
    .await
}

pub const MULTIPART_BOUNDARY: &str = "folio-test-boundary";

/// Encode text fields, plus optional `(name, filename, bytes)` file parts,
/// as a `multipart/form-data` body delimited by [`MULTIPART_BOUNDARY`].
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, filename, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(
    app: Router,
    uri: &str,
    body: Vec<u8>,
    token: Option<&str>,
    want_json: bool,
) -> Response<Body> {
    let content_type = format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}");
    post_body(app, uri, &content_type, body, token, want_json).await
}

/// POST a raw body with the admin cookie when `token` is given.
pub async fn post_body(
    app: Router,
    uri: &str,
    content_type: &str,
    body: Vec<u8>,
    token: Option<&str>,
    want_json: bool,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, content_type);
    if let Some(token) = token {
        builder = builder.header(COOKIE, format!("folio_admin={token}"));
    }
    if want_json {
        builder = builder.header(ACCEPT, "application/json");
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("location")
        .expect("redirect must carry a Location header")
        .to_str()
        .unwrap()
}

/// The visitor id from a `Set-Cookie: folio_vid=...` header, if any.
pub fn issued_visitor(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| value.strip_prefix("folio_vid="))
        .and_then(|rest| rest.split(';').next())
        .map(str::to_string)
}
