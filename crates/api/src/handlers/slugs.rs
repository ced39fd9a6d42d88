//! Live slug-availability check for the admin forms.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::content::SlugScope;
use folio_db::repositories::{CategoryRepo, PageRepo, ProjectRepo};
use serde::{Deserialize, Serialize};

use crate::middleware::admin::AdminSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SlugCheckParams {
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub scope: Option<String>,
    /// The slug the entity being edited has now; it does not count as taken.
    pub current: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SlugAvailability {
    pub available: bool,
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// GET /api/admin/validate/slug?slug=&type=&current=
///
/// Missing parameters or an unknown `type` answer 400 with
/// `available: false`; a database failure answers 500 the same way.
pub async fn check_slug(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<SlugCheckParams>,
) -> (StatusCode, Json<SlugAvailability>) {
    let unavailable = |status| (status, Json(SlugAvailability { available: false }));

    let (Some(slug), Some(scope)) = (
        trimmed(params.slug.as_deref()),
        trimmed(params.scope.as_deref()),
    ) else {
        return unavailable(StatusCode::BAD_REQUEST);
    };
    let Ok(scope) = scope.parse::<SlugScope>() else {
        return unavailable(StatusCode::BAD_REQUEST);
    };
    let current = trimmed(params.current.as_deref());

    let taken = match scope {
        SlugScope::Project => ProjectRepo::slug_taken(&state.pool, slug, current).await,
        SlugScope::Category => CategoryRepo::slug_taken(&state.pool, slug, current).await,
        SlugScope::Page => PageRepo::slug_taken(&state.pool, slug, current).await,
    };

    match taken {
        Ok(taken) => (StatusCode::OK, Json(SlugAvailability { available: !taken })),
        Err(e) => {
            tracing::error!(error = %e, scope = %scope, "Slug check failed");
            unavailable(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
