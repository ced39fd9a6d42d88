//! Project reaction model.

use folio_core::content::ReactionKind;
use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `project_reactions` table; unique per `(project, visitor)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectReaction {
    pub id: DbId,
    pub project_id: DbId,
    pub visitor_id: String,
    #[sqlx(try_from = "String")]
    pub kind: ReactionKind,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Number of reactions of one kind on one project.
#[derive(Debug, Clone, FromRow)]
pub struct ReactionCount {
    pub project_id: DbId,
    #[sqlx(try_from = "String")]
    pub kind: ReactionKind,
    pub count: i64,
}
