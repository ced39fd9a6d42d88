use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use folio_core::error::CoreError;
use folio_db::repositories::PageRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/pages/{slug}
///
/// Drafts are reported as not found.
pub async fn get_published_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Page", &slug))?;
    Ok(Json(DataResponse { data: page }))
}
