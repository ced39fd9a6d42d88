//! Contact/outbound link click model.

use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `contact_clicks` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactClick {
    pub id: DbId,
    pub href: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateContactClick {
    pub href: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

/// Clicks grouped by destination.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HrefCount {
    pub href: String,
    pub count: i64,
}
