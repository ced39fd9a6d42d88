//! Route definitions for the syndication documents.

use axum::routing::get;
use axum::Router;

use crate::handlers::feeds;
use crate::state::AppState;

/// Routes mounted at the root.
///
/// ```text
/// GET /rss.xml       -> rss_feed
/// GET /feed.xml      -> rss_feed
/// GET /atom          -> atom_feed
/// GET /sitemap.xml   -> sitemap_xml
/// GET /robots.txt    -> robots
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rss.xml", get(feeds::rss_feed))
        .route("/feed.xml", get(feeds::rss_feed))
        .route("/atom", get(feeds::atom_feed))
        .route("/sitemap.xml", get(feeds::sitemap_xml))
        .route("/robots.txt", get(feeds::robots))
}
