//! RSS, Atom, sitemap and robots.txt.
//!
//! Draft projects and pages are left out of every document.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use chrono::Utc;
use folio_core::content::ProjectStatus;
use folio_core::feed::{atom, robots_txt, rss, sitemap, FeedEntry, SitemapUrl};
use folio_db::models::project::Project;
use folio_db::repositories::{PageRepo, ProjectRepo};

use crate::error::AppResult;
use crate::state::AppState;

const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
const ATOM_CONTENT_TYPE: &str = "application/atom+xml; charset=utf-8";
const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

async fn public_projects(state: &AppState) -> AppResult<Vec<Project>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(projects
        .into_iter()
        .filter(|p| p.status != ProjectStatus::Draft)
        .collect())
}

fn feed_entries(projects: &[Project]) -> Vec<FeedEntry> {
    projects
        .iter()
        .map(|p| FeedEntry {
            slug: p.slug.clone(),
            title: p.title.clone(),
            summary: p.summary().to_string(),
            published: p.created_at,
            updated: p.updated_at,
        })
        .collect()
}

/// GET /rss.xml and GET /feed.xml
pub async fn rss_feed(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let projects = public_projects(&state).await?;
    let xml = rss(&state.config.site, &feed_entries(&projects), Utc::now());
    Ok(([(CONTENT_TYPE, RSS_CONTENT_TYPE)], xml))
}

/// GET /atom
pub async fn atom_feed(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let projects = public_projects(&state).await?;
    let xml = atom(&state.config.site, &feed_entries(&projects), Utc::now());
    Ok(([(CONTENT_TYPE, ATOM_CONTENT_TYPE)], xml))
}

/// GET /sitemap.xml
///
/// Home and project index, then every public project and published page.
pub async fn sitemap_xml(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let site = &state.config.site;
    let projects = public_projects(&state).await?;
    let pages = PageRepo::list_published(&state.pool).await?;

    let mut urls = vec![
        SitemapUrl {
            loc: site.base_url.clone(),
            last_modified: None,
        },
        SitemapUrl {
            loc: format!("{}/projects", site.base_url),
            last_modified: None,
        },
    ];
    urls.extend(projects.iter().map(|p| SitemapUrl {
        loc: site.project_url(&p.slug),
        last_modified: Some(p.updated_at),
    }));
    urls.extend(pages.iter().map(|p| SitemapUrl {
        loc: site.page_url(&p.slug),
        last_modified: Some(p.updated_at),
    }));

    Ok(([(CONTENT_TYPE, XML_CONTENT_TYPE)], sitemap(&urls)))
}

/// GET /robots.txt
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    ([(CONTENT_TYPE, TEXT_CONTENT_TYPE)], robots_txt(&state.config.site))
}
