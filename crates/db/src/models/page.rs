//! Static page entity model and DTOs.

use folio_core::content::PageStatus;
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `pages` table (About, Contact, ...).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: PageStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated fields for creating or replacing a page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInput {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: PageStatus,
}
