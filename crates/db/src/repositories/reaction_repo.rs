//! Repository for the `project_reactions` table.

use folio_core::analytics::ReactionTally;
use folio_core::content::ReactionKind;
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::reaction::{ProjectReaction, ReactionCount};

const COLUMNS: &str = "id, project_id, visitor_id, kind, created_at, updated_at";

/// One reaction per `(project, visitor)`; a new reaction replaces the old.
pub struct ReactionRepo;

impl ReactionRepo {
    /// Insert or replace the visitor's reaction on a project.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        visitor_id: &str,
        kind: ReactionKind,
    ) -> Result<ProjectReaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_reactions (project_id, visitor_id, kind)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_project_reactions_project_visitor
             DO UPDATE SET kind = EXCLUDED.kind, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectReaction>(&query)
            .bind(project_id)
            .bind(visitor_id)
            .bind(kind.as_str())
            .fetch_one(pool)
            .await
    }

    /// The visitor's current reaction on a project, if any.
    pub async fn find_kind(
        pool: &PgPool,
        project_id: DbId,
        visitor_id: &str,
    ) -> Result<Option<ReactionKind>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_reactions WHERE project_id = $1 AND visitor_id = $2"
        );
        let row = sqlx::query_as::<_, ProjectReaction>(&query)
            .bind(project_id)
            .bind(visitor_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|reaction| reaction.kind))
    }

    /// Like and dislike counts for a single project.
    pub async fn totals(pool: &PgPool, project_id: DbId) -> Result<ReactionTally, sqlx::Error> {
        let counts = sqlx::query_as::<_, ReactionCount>(
            "SELECT project_id, kind, COUNT(*) AS count
             FROM project_reactions
             WHERE project_id = $1
             GROUP BY project_id, kind",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        let mut tally = ReactionTally::default();
        for row in counts {
            tally.add(row.kind, row.count);
        }
        Ok(tally)
    }

    /// Counts grouped by project and kind across every project.
    pub async fn counts_all(pool: &PgPool) -> Result<Vec<ReactionCount>, sqlx::Error> {
        sqlx::query_as::<_, ReactionCount>(
            "SELECT project_id, kind, COUNT(*) AS count
             FROM project_reactions
             GROUP BY project_id, kind
             ORDER BY project_id ASC",
        )
        .fetch_all(pool)
        .await
    }
}
