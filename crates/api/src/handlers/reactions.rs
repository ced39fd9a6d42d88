//! Like/dislike reactions, one mutable slot per visitor and project.

use axum::extract::{Path, State};
use axum::Json;
use folio_core::content::ReactionKind;
use folio_core::error::{CoreError, FormError};
use folio_core::rate_limit::REACTIONS;
use folio_core::types::DbId;
use folio_db::repositories::{ProjectRepo, ReactionRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::client_ip::ClientIp;
use crate::middleware::visitor::VisitorToken;
use crate::rate_limit::enforce;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    pub ok: bool,
    pub like_count: i64,
    pub dislike_count: i64,
    /// The caller's current reaction.
    pub mine: Option<ReactionKind>,
}

#[derive(Debug, Deserialize)]
pub struct ReactRequest {
    pub kind: Option<String>,
}

async fn project_id(state: &AppState, slug: &str) -> AppResult<DbId> {
    let id = ProjectRepo::find_id_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", slug))?;
    Ok(id)
}

/// GET /api/projects/{slug}/reaction
///
/// Totals plus the caller's own reaction. Issues the visitor cookie on
/// first contact.
pub async fn get_reaction(
    State(state): State<AppState>,
    visitor: VisitorToken,
    Path(slug): Path<String>,
) -> AppResult<(VisitorToken, Json<ReactionSummary>)> {
    let project_id = project_id(&state, &slug).await?;

    let (mine, totals) = tokio::try_join!(
        ReactionRepo::find_kind(&state.pool, project_id, &visitor.id),
        ReactionRepo::totals(&state.pool, project_id),
    )?;

    Ok((
        visitor,
        Json(ReactionSummary {
            ok: true,
            like_count: totals.likes,
            dislike_count: totals.dislikes,
            mine,
        }),
    ))
}

/// POST /api/projects/{slug}/reaction
///
/// Set the caller's reaction, replacing any previous one. Sending the same
/// kind again leaves it set.
pub async fn set_reaction(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    visitor: VisitorToken,
    Path(slug): Path<String>,
    JsonBody(body): JsonBody<ReactRequest>,
) -> AppResult<(VisitorToken, Json<ReactionSummary>)> {
    enforce(state.rate_limiter.as_ref(), &REACTIONS, &ip).await?;

    let kind = body
        .kind
        .as_deref()
        .and_then(|raw| raw.parse::<ReactionKind>().ok())
        .ok_or(CoreError::Form(FormError::BadReactionKind))?;

    let project_id = project_id(&state, &slug).await?;
    ReactionRepo::upsert(&state.pool, project_id, &visitor.id, kind).await?;
    let totals = ReactionRepo::totals(&state.pool, project_id).await?;

    tracing::info!(project_id, kind = %kind, new_visitor = visitor.is_new(), "Reaction recorded");

    Ok((
        visitor,
        Json(ReactionSummary {
            ok: true,
            like_count: totals.likes,
            dislike_count: totals.dislikes,
            mine: Some(kind),
        }),
    ))
}
