//! Admin create/update/delete for static pages.

use axum::extract::{Path, State};
use folio_core::error::{ConflictReason, CoreError, FormError};
use folio_core::types::DbId;
use folio_db::models::page::Page;
use folio_db::repositories::PageRepo;

use crate::error::AppResult;
use crate::extract::{AdminForm, ResponseFormat};
use crate::flash::{AdminAction, AdminEntity, AdminFailure, AdminOutcome, AdminReply};
use crate::forms::{parse_id, PageForm};
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

const ENTITY: AdminEntity = AdminEntity::Page;

fn slug_conflict(slug: &str) -> CoreError {
    CoreError::conflict(
        ConflictReason::SlugTaken,
        format!("A page with slug '{slug}' already exists"),
    )
}

async fn create(state: &AppState, form: Result<PageForm, FormError>) -> AppResult<Page> {
    let input = form?.validate()?;
    if PageRepo::slug_taken(&state.pool, &input.slug, None).await? {
        return Err(slug_conflict(&input.slug).into());
    }
    Ok(PageRepo::create(&state.pool, &input).await?)
}

async fn update(state: &AppState, raw_id: &str, form: Result<PageForm, FormError>) -> AppResult<Page> {
    let id = parse_id(raw_id)?;
    let input = form?.validate()?;

    let current = PageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Page", id))?;
    if PageRepo::slug_taken(&state.pool, &input.slug, Some(&current.slug)).await? {
        return Err(slug_conflict(&input.slug).into());
    }

    let page = PageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Page", id))?;
    Ok(page)
}

async fn delete(state: &AppState, raw_id: &str) -> AppResult<DbId> {
    let id = parse_id(raw_id)?;
    if !PageRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("Page", id).into());
    }
    Ok(id)
}

/// POST /api/admin/pages
pub async fn create_page(
    admin: AdminSession,
    State(state): State<AppState>,
    format: ResponseFormat,
    AdminForm(form): AdminForm<PageForm>,
) -> AdminReply {
    let action = AdminAction::Create;
    let result = match create(&state, form).await {
        Ok(page) => {
            tracing::info!(page_id = page.id, slug = %page.slug, admin = %admin.email, "Page created");
            Ok(AdminOutcome::new(ENTITY, action))
        }
        Err(e) => Err(AdminFailure::from_error(e, ENTITY, action, ENTITY.listing_path())),
    };
    AdminReply { format, result }
}

/// POST /api/admin/pages/{id}
pub async fn update_page(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    format: ResponseFormat,
    AdminForm(form): AdminForm<PageForm>,
) -> AdminReply {
    let action = AdminAction::Update;
    let result = match update(&state, &id, form).await {
        Ok(page) => {
            tracing::info!(page_id = page.id, slug = %page.slug, admin = %admin.email, "Page updated");
            Ok(AdminOutcome::new(ENTITY, action))
        }
        Err(e) => Err(AdminFailure::from_error(e, ENTITY, action, ENTITY.listing_path())),
    };
    AdminReply { format, result }
}

/// POST /api/admin/pages/{id}/delete
pub async fn delete_page(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    format: ResponseFormat,
) -> AdminReply {
    let action = AdminAction::Delete;
    let result = match delete(&state, &id).await {
        Ok(page_id) => {
            tracing::info!(page_id, admin = %admin.email, "Page deleted");
            Ok(AdminOutcome::new(ENTITY, action))
        }
        Err(e) => Err(AdminFailure::from_error(e, ENTITY, action, ENTITY.listing_path())),
    };
    AdminReply { format, result }
}
