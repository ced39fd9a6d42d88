//! Admin create/update/delete for categories.

use axum::extract::{Path, State};
use folio_core::error::{ConflictReason, CoreError, FormError};
use folio_core::types::DbId;
use folio_db::models::category::Category;
use folio_db::repositories::{CategoryRepo, ProjectRepo};

use crate::error::AppResult;
use crate::extract::{AdminForm, ResponseFormat};
use crate::flash::{AdminAction, AdminEntity, AdminFailure, AdminOutcome, AdminReply};
use crate::forms::{parse_id, CategoryForm};
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

const ENTITY: AdminEntity = AdminEntity::Category;

fn slug_conflict(slug: &str) -> CoreError {
    CoreError::conflict(
        ConflictReason::SlugTaken,
        format!("A category with slug '{slug}' already exists"),
    )
}

async fn create(state: &AppState, form: Result<CategoryForm, FormError>) -> AppResult<Category> {
    let input = form?.validate()?;
    if CategoryRepo::slug_taken(&state.pool, &input.slug, None).await? {
        return Err(slug_conflict(&input.slug).into());
    }
    Ok(CategoryRepo::create(&state.pool, &input).await?)
}

async fn update(state: &AppState, raw_id: &str, form: Result<CategoryForm, FormError>) -> AppResult<Category> {
    let id = parse_id(raw_id)?;
    let input = form?.validate()?;

    let current = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Category", id))?;
    if CategoryRepo::slug_taken(&state.pool, &input.slug, Some(&current.slug)).await? {
        return Err(slug_conflict(&input.slug).into());
    }

    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Category", id))?;
    Ok(category)
}

/// Refuses while any project still points at the category.
async fn delete(state: &AppState, raw_id: &str) -> AppResult<DbId> {
    let id = parse_id(raw_id)?;

    let in_use = ProjectRepo::count_by_category(&state.pool, id).await?;
    if in_use > 0 {
        return Err(CoreError::conflict(
            ConflictReason::CategoryInUse,
            format!("Category is used by {in_use} project(s)"),
        )
        .into());
    }

    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("Category", id).into());
    }
    Ok(id)
}

/// POST /api/admin/categories
pub async fn create_category(
    admin: AdminSession,
    State(state): State<AppState>,
    format: ResponseFormat,
    AdminForm(form): AdminForm<CategoryForm>,
) -> AdminReply {
    let action = AdminAction::Create;
    let result = match create(&state, form).await {
        Ok(category) => {
            tracing::info!(category_id = category.id, admin = %admin.email, "Category created");
            Ok(AdminOutcome::new(ENTITY, action))
        }
        Err(e) => Err(AdminFailure::from_error(e, ENTITY, action, ENTITY.listing_path())),
    };
    AdminReply { format, result }
}

/// POST /api/admin/categories/{id}
pub async fn update_category(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    format: ResponseFormat,
    AdminForm(form): AdminForm<CategoryForm>,
) -> AdminReply {
    let action = AdminAction::Update;
    let result = match update(&state, &id, form).await {
        Ok(category) => {
            tracing::info!(category_id = category.id, admin = %admin.email, "Category updated");
            Ok(AdminOutcome::new(ENTITY, action))
        }
        Err(e) => Err(AdminFailure::from_error(e, ENTITY, action, ENTITY.listing_path())),
    };
    AdminReply { format, result }
}

/// POST /api/admin/categories/{id}/delete
pub async fn delete_category(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    format: ResponseFormat,
) -> AdminReply {
    let action = AdminAction::Delete;
    let result = match delete(&state, &id).await {
        Ok(category_id) => {
            tracing::info!(category_id, admin = %admin.email, "Category deleted");
            Ok(AdminOutcome::new(ENTITY, action))
        }
        Err(e) => Err(AdminFailure::from_error(e, ENTITY, action, ENTITY.listing_path())),
    };
    AdminReply { format, result }
}
