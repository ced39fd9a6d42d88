//! Public project reads and search.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use folio_core::error::CoreError;
use folio_db::models::project::ProjectSearchHit;
use folio_db::repositories::ProjectRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Queries shorter than this return no results.
const MIN_SEARCH_CHARS: usize = 2;

/// GET /api/projects
///
/// Every project in listing order (sort order, then newest year).
pub async fn list_projects(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/projects/{slug}
pub async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", &slug))?;
    Ok(Json(DataResponse { data: project }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// GET /api/search?q=
///
/// Case-insensitive match over the text fields, or an exact tag match.
/// Returns a bare array, newest year first.
pub async fn search_projects(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<ProjectSearchHit>>> {
    let term = params.q.as_deref().map(str::trim).unwrap_or_default();
    if term.chars().count() < MIN_SEARCH_CHARS {
        return Ok(Json(Vec::new()));
    }

    let hits = ProjectRepo::search(&state.pool, term).await?;
    tracing::debug!(term, hits = hits.len(), "Project search");
    Ok(Json(hits))
}
