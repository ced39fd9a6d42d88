//! View and outbound-click tracking.
//!
//! Both endpoints append one row per call with no deduplication.

use axum::extract::State;
use axum::http::header::{REFERER, USER_AGENT};
use axum::http::HeaderMap;
use axum::Json;
use folio_core::device::classify_user_agent;
use folio_core::error::CoreError;
use folio_db::models::contact_click::CreateContactClick;
use folio_db::models::project_view::CreateProjectView;
use folio_db::repositories::{ContactClickRepo, ProjectRepo, ProjectViewRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::visitor::VisitorToken;
use crate::response::OkResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackViewRequest {
    pub slug: Option<String>,
    pub path: Option<String>,
    pub visitor_id: Option<String>,
    pub referrer: Option<String>,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// `Referer`, or the correctly spelled `Referrer` some clients send.
fn header_referrer(headers: &HeaderMap) -> Option<String> {
    header_str(headers, REFERER.as_str())
        .or_else(|| header_str(headers, "referrer"))
        .map(str::to_string)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/track-view
///
/// Record one view of a project. The path defaults to the project's page,
/// the referrer to the request's `Referer` header, and the visitor to the
/// caller's visitor token.
pub async fn track_view(
    State(state): State<AppState>,
    visitor: VisitorToken,
    headers: HeaderMap,
    JsonBody(body): JsonBody<TrackViewRequest>,
) -> AppResult<(VisitorToken, Json<OkResponse>)> {
    let slug = non_empty(body.slug).ok_or_else(|| AppError::BadRequest("Missing slug".into()))?;
    let verbose = !state.config.env.is_production();
    let persistence = |source| AppError::Persistence { source, verbose };

    let project_id = ProjectRepo::find_id_by_slug(&state.pool, &slug)
        .await
        .map_err(persistence)?
        .ok_or_else(|| CoreError::not_found("Project", &slug))?;

    let user_agent = header_str(&headers, USER_AGENT.as_str()).map(str::to_string);
    let input = CreateProjectView {
        project_id,
        path: non_empty(body.path).unwrap_or_else(|| format!("/projects/{slug}")),
        device_type: classify_user_agent(user_agent.as_deref()),
        user_agent,
        referrer: non_empty(body.referrer).or_else(|| header_referrer(&headers)),
        visitor_id: non_empty(body.visitor_id).or_else(|| Some(visitor.id.clone())),
    };

    if verbose {
        tracing::debug!(
            project_id,
            path = %input.path,
            referrer = ?input.referrer,
            device_type = %input.device_type,
            "Recording project view",
        );
    }

    ProjectViewRepo::create(&state.pool, &input)
        .await
        .map_err(persistence)?;

    Ok((visitor, Json(OkResponse::ok())))
}

#[derive(Debug, Deserialize)]
pub struct OutboundRequest {
    pub href: Option<String>,
}

/// POST /api/track/outbound
///
/// Record a click on a contact or external link.
pub async fn track_outbound(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<OutboundRequest>,
) -> AppResult<Json<OkResponse>> {
    let href = non_empty(body.href).ok_or_else(|| AppError::BadRequest("Missing href".into()))?;

    let click = ContactClickRepo::create(
        &state.pool,
        &CreateContactClick {
            href,
            referrer: header_referrer(&headers),
            user_agent: header_str(&headers, USER_AGENT.as_str()).map(str::to_string),
        },
    )
    .await?;

    tracing::debug!(click_id = click.id, href = %click.href, "Outbound click recorded");
    Ok(Json(OkResponse::ok()))
}
