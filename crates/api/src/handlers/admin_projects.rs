//! Admin create/update/delete for projects.

use axum::extract::{Path, State};
use chrono::Datelike;
use folio_core::error::{ConflictReason, CoreError, FormError};
use folio_core::types::DbId;
use folio_db::models::project::Project;
use folio_db::repositories::{CategoryRepo, ProjectRepo};

use crate::error::AppResult;
use crate::extract::{AdminForm, ResponseFormat};
use crate::flash::{AdminAction, AdminEntity, AdminFailure, AdminOutcome, AdminReply};
use crate::forms::ProjectForm;
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

const ENTITY: AdminEntity = AdminEntity::Project;

fn edit_path(slug: &str) -> String {
    format!("/admin/edit/{slug}")
}

/// A referenced category must exist.
async fn ensure_category(state: &AppState, category_id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = category_id {
        if CategoryRepo::find_by_id(&state.pool, id).await?.is_none() {
            return Err(FormError::UnknownCategory.into());
        }
    }
    Ok(())
}

async fn ensure_slug_free(state: &AppState, slug: &str, current: Option<&str>) -> AppResult<()> {
    if ProjectRepo::slug_taken(&state.pool, slug, current).await? {
        return Err(CoreError::conflict(
            ConflictReason::SlugTaken,
            format!("A project with slug '{slug}' already exists"),
        )
        .into());
    }
    Ok(())
}

async fn create(state: &AppState, form: Result<ProjectForm, FormError>) -> AppResult<Project> {
    let input = form?.validate(chrono::Utc::now().year())?;
    ensure_category(state, input.category_id).await?;
    ensure_slug_free(state, &input.slug, None).await?;
    Ok(ProjectRepo::create(&state.pool, &input).await?)
}

async fn update(
    state: &AppState,
    current_slug: &str,
    form: Result<ProjectForm, FormError>,
) -> AppResult<Project> {
    let input = form?.validate(chrono::Utc::now().year())?;
    ensure_category(state, input.category_id).await?;
    ensure_slug_free(state, &input.slug, Some(current_slug)).await?;
    let project = ProjectRepo::update_by_slug(&state.pool, current_slug, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", current_slug))?;
    Ok(project)
}

async fn delete(state: &AppState, slug: &str) -> AppResult<()> {
    if !ProjectRepo::delete_by_slug(&state.pool, slug).await? {
        return Err(CoreError::not_found("Project", slug).into());
    }
    Ok(())
}

/// POST /api/admin/projects
pub async fn create_project(
    admin: AdminSession,
    State(state): State<AppState>,
    format: ResponseFormat,
    AdminForm(form): AdminForm<ProjectForm>,
) -> AdminReply {
    let action = AdminAction::Create;
    let result = match create(&state, form).await {
        Ok(project) => {
            tracing::info!(project_id = project.id, slug = %project.slug, admin = %admin.email, "Project created");
            Ok(AdminOutcome::new(ENTITY, action))
        }
        Err(e) => Err(AdminFailure::from_error(e, ENTITY, action, ENTITY.listing_path())),
    };
    AdminReply { format, result }
}

/// POST /api/admin/projects/{slug}
///
/// Full replacement of the project's fields; the slug may change. A blank
/// cover image keeps the stored one.
pub async fn update_project(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    format: ResponseFormat,
    AdminForm(form): AdminForm<ProjectForm>,
) -> AdminReply {
    let action = AdminAction::Update;
    let result = match update(&state, &slug, form).await {
        Ok(project) => {
            tracing::info!(project_id = project.id, slug = %project.slug, admin = %admin.email, "Project updated");
            Ok(AdminOutcome::new(ENTITY, action))
        }
        Err(e) => Err(AdminFailure::from_error(e, ENTITY, action, edit_path(&slug))),
    };
    AdminReply { format, result }
}

/// POST /api/admin/projects/{slug}/delete
///
/// Views and reactions go with the project.
pub async fn delete_project(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    format: ResponseFormat,
) -> AdminReply {
    let action = AdminAction::Delete;
    let result = match delete(&state, &slug).await {
        Ok(()) => {
            tracing::info!(slug = %slug, admin = %admin.email, "Project deleted");
            Ok(AdminOutcome::new(ENTITY, action))
        }
        Err(e) => Err(AdminFailure::from_error(e, ENTITY, action, ENTITY.listing_path())),
    };
    AdminReply { format, result }
}
