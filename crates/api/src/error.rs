use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::error::{CoreError, FormError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "ok": false, "error": <message>, "code": <code> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `folio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database error on an endpoint that reports diagnostics outside
    /// production. `verbose` is decided by the handler from the app mode.
    #[error("Persistence error: {source}")]
    Persistence { source: sqlx::Error, verbose: bool },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        AppError::Core(CoreError::Form(err))
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl AppError {
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "not_found",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
                }
                CoreError::Form(form) => (StatusCode::BAD_REQUEST, form.code(), form.to_string()),
                CoreError::Conflict { reason, message } => {
                    (StatusCode::CONFLICT, reason.code(), message.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
                CoreError::RateLimited => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "rate_limited",
                    "Too many requests".to_string(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Persistence { source, .. } => classify_sqlx_error(source),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = match &self {
            AppError::Persistence { source, verbose: true }
                if status == StatusCode::INTERNAL_SERVER_ERROR =>
            {
                json!({
                    "ok": false,
                    "error": "Internal error",
                    "message": source.to_string(),
                    "name": sqlx_error_name(source),
                    "code": database_code(source).unwrap_or_else(|| code.to_string()),
                })
            }
            _ => json!({
                "ok": false,
                "error": message,
                "code": code,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "not_found",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "duplicate",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                INTERNAL_MESSAGE.to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

fn sqlx_error_name(err: &sqlx::Error) -> &'static str {
    match err {
        sqlx::Error::Database(_) => "DatabaseError",
        sqlx::Error::PoolTimedOut => "PoolTimedOut",
        sqlx::Error::PoolClosed => "PoolClosed",
        sqlx::Error::Io(_) => "IoError",
        sqlx::Error::Tls(_) => "TlsError",
        sqlx::Error::Protocol(_) => "ProtocolError",
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => "DecodeError",
        _ => "SqlxError",
    }
}

fn database_code(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}
