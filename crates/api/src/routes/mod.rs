pub mod admin;
pub mod feeds;
pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{categories, pages, projects, reactions, subscribe, tracking};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /projects                      list (GET)
/// /projects/{slug}               get (GET)
/// /projects/{slug}/reaction      counts + own reaction (GET), react (POST)
/// /categories                    list (GET)
/// /pages/{slug}                  published page (GET)
/// /search                        project search (GET, ?q=)
/// /subscribe                     newsletter signup (POST)
/// /track-view                    record a project view (POST)
/// /track/outbound                record a contact link click (POST)
///
/// /admin/...                     see routes::admin
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(projects::list_projects))
        .route("/projects/{slug}", get(projects::get_project))
        .route(
            "/projects/{slug}/reaction",
            get(reactions::get_reaction).post(reactions::set_reaction),
        )
        .route("/categories", get(categories::list_categories))
        .route("/pages/{slug}", get(pages::get_published_page))
        .route("/search", get(projects::search_projects))
        .route("/subscribe", post(subscribe::subscribe))
        .route("/track-view", post(tracking::track_view))
        .route("/track/outbound", post(tracking::track_outbound))
        .nest("/admin", admin::router())
}
