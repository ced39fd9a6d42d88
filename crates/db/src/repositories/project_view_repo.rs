//! Repository for the append-only `project_views` table and its aggregates.

use folio_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::project_view::{
    CreateProjectView, DayCount, LabelCount, ProjectView, RecentView, ViewExportRow,
};

const COLUMNS: &str =
    "id, project_id, path, user_agent, referrer, visitor_id, device_type, created_at";

/// Records views and answers the analytics queries over them.
///
/// Range queries take a half-open `[from, until)` interval.
pub struct ProjectViewRepo;

impl ProjectViewRepo {
    pub async fn create(pool: &PgPool, input: &CreateProjectView) -> Result<ProjectView, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_views (project_id, path, user_agent, referrer, visitor_id, device_type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectView>(&query)
            .bind(input.project_id)
            .bind(&input.path)
            .bind(&input.user_agent)
            .bind(&input.referrer)
            .bind(&input.visitor_id)
            .bind(input.device_type.as_str())
            .fetch_one(pool)
            .await
    }

    /// Total number of views ever recorded.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM project_views")
            .fetch_one(pool)
            .await
    }

    /// Number of distinct non-null visitor ids ever recorded.
    pub async fn count_unique_visitors(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT visitor_id) FROM project_views")
            .fetch_one(pool)
            .await
    }

    /// The most recent views, newest first, joined with their project.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<RecentView>, sqlx::Error> {
        sqlx::query_as::<_, RecentView>(
            "SELECT v.id, p.slug AS project_slug, p.title AS project_title,
                    v.path, v.referrer, v.device_type, v.created_at
             FROM project_views v
             JOIN projects p ON p.id = v.project_id
             ORDER BY v.created_at DESC, v.id DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Views per UTC calendar day. Days without views are absent.
    pub async fn daily_counts(
        pool: &PgPool,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<DayCount>, sqlx::Error> {
        sqlx::query_as::<_, DayCount>(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS count
             FROM project_views
             WHERE created_at >= $1 AND created_at < $2
             GROUP BY day
             ORDER BY day ASC",
        )
        .bind(from)
        .bind(until)
        .fetch_all(pool)
        .await
    }

    /// Views per device type in the range, most frequent first.
    pub async fn device_counts(
        pool: &PgPool,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<LabelCount>, sqlx::Error> {
        sqlx::query_as::<_, LabelCount>(
            "SELECT device_type AS label, COUNT(*) AS count
             FROM project_views
             WHERE created_at >= $1 AND created_at < $2
             GROUP BY device_type
             ORDER BY count DESC, label ASC",
        )
        .bind(from)
        .bind(until)
        .fetch_all(pool)
        .await
    }

    /// Views per raw referrer string in the range. Hostname reduction
    /// happens in the caller since several raw values share a host.
    pub async fn referrer_counts(
        pool: &PgPool,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<LabelCount>, sqlx::Error> {
        sqlx::query_as::<_, LabelCount>(
            "SELECT referrer AS label, COUNT(*) AS count
             FROM project_views
             WHERE created_at >= $1 AND created_at < $2
             GROUP BY referrer",
        )
        .bind(from)
        .bind(until)
        .fetch_all(pool)
        .await
    }

    /// Every view in the range joined with its project slug, newest first.
    pub async fn export_range(
        pool: &PgPool,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<ViewExportRow>, sqlx::Error> {
        sqlx::query_as::<_, ViewExportRow>(
            "SELECT v.created_at, p.slug AS project_slug, v.path, v.referrer, v.device_type
             FROM project_views v
             JOIN projects p ON p.id = v.project_id
             WHERE v.created_at >= $1 AND v.created_at < $2
             ORDER BY v.created_at DESC, v.id DESC",
        )
        .bind(from)
        .bind(until)
        .fetch_all(pool)
        .await
    }
}
