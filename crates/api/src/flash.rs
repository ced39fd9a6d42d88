//! Typed results for admin mutations and their two renderings.
//!
//! Every admin handler resolves to `Result<AdminOutcome, AdminFailure>`.
//! Browsers get a 303 back to an admin page with a `notice` or `error`
//! flash code; clients asking for JSON get the same information as a body
//! with a matching status code.

use std::borrow::Cow;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use folio_core::error::CoreError;
use serde::Serialize;

use crate::error::AppError;
use crate::extract::ResponseFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminEntity {
    Project,
    Category,
    Page,
}

impl AdminEntity {
    pub fn as_str(self) -> &'static str {
        match self {
            AdminEntity::Project => "project",
            AdminEntity::Category => "category",
            AdminEntity::Page => "page",
        }
    }

    fn label(self) -> &'static str {
        match self {
            AdminEntity::Project => "Project",
            AdminEntity::Category => "Category",
            AdminEntity::Page => "Page",
        }
    }

    /// Admin page listing this kind of entity.
    pub fn listing_path(self) -> &'static str {
        match self {
            AdminEntity::Project | AdminEntity::Category => "/admin",
            AdminEntity::Page => "/admin/pages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Create,
    Update,
    Delete,
}

impl AdminAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AdminAction::Create => "create",
            AdminAction::Update => "update",
            AdminAction::Delete => "delete",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            AdminAction::Create => "created",
            AdminAction::Update => "updated",
            AdminAction::Delete => "deleted",
        }
    }
}

/// A mutation that went through.
#[derive(Debug, Clone)]
pub struct AdminOutcome {
    pub entity: AdminEntity,
    pub action: AdminAction,
    /// Admin page to land on.
    pub return_to: String,
}

impl AdminOutcome {
    pub fn new(entity: AdminEntity, action: AdminAction) -> Self {
        Self {
            entity,
            action,
            return_to: entity.listing_path().to_string(),
        }
    }

    /// Flash code, e.g. `project_created`.
    pub fn notice(&self) -> String {
        format!("{}_{}", self.entity.as_str(), self.action.past_tense())
    }

    fn message(&self) -> String {
        format!("{} {}", self.entity.label(), self.action.past_tense())
    }
}

/// A mutation that was refused or failed.
#[derive(Debug, Clone)]
pub struct AdminFailure {
    pub code: Cow<'static, str>,
    pub status: StatusCode,
    pub message: String,
    /// Admin page to land on (usually the form that was submitted).
    pub return_to: String,
}

impl AdminFailure {
    /// Classify an error raised while performing `action` on `entity`.
    ///
    /// Validation, missing rows and conflicts keep their own codes; anything
    /// else is logged and reported as `<action>_failed`.
    pub fn from_error(
        err: AppError,
        entity: AdminEntity,
        action: AdminAction,
        return_to: impl Into<String>,
    ) -> Self {
        let return_to = return_to.into();
        let failure = |code: Cow<'static, str>, status, message: String| AdminFailure {
            code,
            status,
            message,
            return_to: return_to.clone(),
        };

        match err {
            AppError::Core(CoreError::Form(form)) => {
                failure(form.code().into(), StatusCode::BAD_REQUEST, form.to_string())
            }
            AppError::Core(CoreError::NotFound { entity: kind, key }) => failure(
                "not_found".into(),
                StatusCode::NOT_FOUND,
                format!("{kind} '{key}' not found"),
            ),
            AppError::Core(CoreError::Conflict { reason, message }) => {
                failure(reason.code().into(), StatusCode::CONFLICT, message)
            }
            AppError::Database(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some("23505")
                    && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
            {
                failure(
                    "duplicate".into(),
                    StatusCode::CONFLICT,
                    format!("Another {} already uses that value", entity.as_str()),
                )
            }
            other => {
                tracing::error!(
                    error = %other,
                    entity = entity.as_str(),
                    action = action.as_str(),
                    "Admin mutation failed",
                );
                failure(
                    format!("{}_failed", action.as_str()).into(),
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Could not {} {}", action.as_str(), entity.as_str()),
                )
            }
        }
    }
}

pub type AdminResult = Result<AdminOutcome, AdminFailure>;

/// Render an [`AdminResult`] in the format the caller asked for.
pub struct AdminReply {
    pub format: ResponseFormat,
    pub result: AdminResult,
}

#[derive(Serialize)]
struct AdminJson<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    message: &'a str,
}

fn with_flash(path: &str, key: &str, code: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{key}={code}")
}

impl IntoResponse for AdminReply {
    fn into_response(self) -> Response {
        match (self.format, self.result) {
            (ResponseFormat::Redirect, Ok(outcome)) => {
                Redirect::to(&with_flash(&outcome.return_to, "notice", &outcome.notice()))
                    .into_response()
            }
            (ResponseFormat::Redirect, Err(failure)) => {
                Redirect::to(&with_flash(&failure.return_to, "error", &failure.code))
                    .into_response()
            }
            (ResponseFormat::Json, Ok(outcome)) => {
                let notice = outcome.notice();
                let message = outcome.message();
                let body = AdminJson {
                    ok: true,
                    notice: Some(&notice),
                    error: None,
                    message: &message,
                };
                (StatusCode::OK, Json(body)).into_response()
            }
            (ResponseFormat::Json, Err(failure)) => {
                let body = AdminJson {
                    ok: false,
                    notice: None,
                    error: Some(&failure.code),
                    message: &failure.message,
                };
                (failure.status, Json(body)).into_response()
            }
        }
    }
}
