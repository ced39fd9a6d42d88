//! Route definitions for the admin surface.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin_categories, admin_pages, admin_projects, analytics, slugs};
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires an admin session.
///
/// ```text
/// POST /projects                   -> create_project
/// POST /projects/{slug}            -> update_project
/// POST /projects/{slug}/delete     -> delete_project
/// POST /categories                 -> create_category
/// POST /categories/{id}            -> update_category
/// POST /categories/{id}/delete     -> delete_category
/// POST /pages                      -> create_page
/// POST /pages/{id}                 -> update_page
/// POST /pages/{id}/delete          -> delete_page
/// GET  /analytics                  -> analytics_report  (?start=&end=)
/// GET  /analytics/export           -> export_views_csv  (?start=&end=)
/// GET  /validate/slug              -> check_slug        (?slug=&type=&current=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", post(admin_projects::create_project))
        .route("/projects/{slug}", post(admin_projects::update_project))
        .route("/projects/{slug}/delete", post(admin_projects::delete_project))
        .route("/categories", post(admin_categories::create_category))
        .route("/categories/{id}", post(admin_categories::update_category))
        .route(
            "/categories/{id}/delete",
            post(admin_categories::delete_category),
        )
        .route("/pages", post(admin_pages::create_page))
        .route("/pages/{id}", post(admin_pages::update_page))
        .route("/pages/{id}/delete", post(admin_pages::delete_page))
        .route("/analytics", get(analytics::analytics_report))
        .route("/analytics/export", get(analytics::export_views_csv))
        .route("/validate/slug", get(slugs::check_slug))
}
