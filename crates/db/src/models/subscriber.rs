//! Newsletter subscriber model.

use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsletterSubscriber {
    pub id: DbId,
    pub email: String,
    pub created_at: Timestamp,
}
