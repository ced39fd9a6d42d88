//! Project entity model and DTOs.

use folio_core::content::ProjectStatus;
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    /// Markdown source; rendered by the frontend.
    pub content: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub year: i32,
    pub tags: Vec<String>,
    pub tech_stack: Vec<String>,
    pub category_id: Option<DbId>,
    pub sort_order: i32,
    pub featured: bool,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Short text used by feeds and cards: subtitle, else description.
    pub fn summary(&self) -> &str {
        self.subtitle
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.description)
    }
}

/// Validated fields for creating or replacing a project.
///
/// `cover_image_url` of `None` on update keeps the stored image.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub content: Option<String>,
    pub status: ProjectStatus,
    pub year: i32,
    pub tags: Vec<String>,
    pub tech_stack: Vec<String>,
    pub category_id: Option<DbId>,
    pub sort_order: i32,
    pub featured: bool,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub cover_image_url: Option<String>,
}

/// Compact search result.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSearchHit {
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub tags: Vec<String>,
}
