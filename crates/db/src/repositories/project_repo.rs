//! Repository for the `projects` table.

use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{Project, ProjectInput, ProjectSearchHit};
use crate::repositories::contains_pattern;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, title, subtitle, description, content, status, year, tags, \
     tech_stack, category_id, sort_order, featured, github_url, live_url, cover_image_url, \
     created_at, updated_at";

/// Public listing order: explicit sort order first, newest year next.
const LISTING_ORDER: &str = "sort_order ASC, year DESC, id ASC";

/// Provides CRUD and lookup operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &ProjectInput) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (slug, title, subtitle, description, content, status, year, \
                 tags, tech_stack, category_id, sort_order, featured, github_url, live_url, \
                 cover_image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.status.as_str())
            .bind(input.year)
            .bind(&input.tags)
            .bind(&input.tech_stack)
            .bind(input.category_id)
            .bind(input.sort_order)
            .bind(input.featured)
            .bind(&input.github_url)
            .bind(&input.live_url)
            .bind(&input.cover_image_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE slug = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a slug to its id without loading the row.
    pub async fn find_id_by_slug(pool: &PgPool, slug: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM projects WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// All projects in public listing order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY {LISTING_ORDER}");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    pub async fn list_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM projects ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Replace every editable field of the project currently at `slug`.
    ///
    /// The slug itself may change. `cover_image_url` is only overwritten when
    /// the input carries one. Returns `None` if no project has `slug`.
    pub async fn update_by_slug(
        pool: &PgPool,
        slug: &str,
        input: &ProjectInput,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                slug = $2,
                title = $3,
                subtitle = $4,
                description = $5,
                content = $6,
                status = $7,
                year = $8,
                tags = $9,
                tech_stack = $10,
                category_id = $11,
                sort_order = $12,
                featured = $13,
                github_url = $14,
                live_url = $15,
                cover_image_url = COALESCE($16, cover_image_url),
                updated_at = NOW()
             WHERE slug = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(slug)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.status.as_str())
            .bind(input.year)
            .bind(&input.tags)
            .bind(&input.tech_stack)
            .bind(input.category_id)
            .bind(input.sort_order)
            .bind(input.featured)
            .bind(&input.github_url)
            .bind(&input.live_url)
            .bind(&input.cover_image_url)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project; its views and reactions cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete_by_slug(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether any project other than `except` already uses `slug`.
    pub async fn slug_taken(
        pool: &PgPool,
        slug: &str,
        except: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM projects WHERE slug = $1 AND ($2::TEXT IS NULL OR slug <> $2)
             )",
        )
        .bind(slug)
        .bind(except)
        .fetch_one(pool)
        .await
    }

    /// Number of projects filed under a category.
    pub async fn count_by_category(pool: &PgPool, category_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(pool)
            .await
    }

    /// Case-insensitive substring search over the text fields, plus an exact
    /// match on the lower-cased tag list. Newest year first.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<ProjectSearchHit>, sqlx::Error> {
        sqlx::query_as::<_, ProjectSearchHit>(
            "SELECT slug, title, subtitle, tags
             FROM projects
             WHERE title ILIKE $1
                OR subtitle ILIKE $1
                OR description ILIKE $1
                OR content ILIKE $1
                OR $2 = ANY (tags)
             ORDER BY year DESC, id ASC",
        )
        .bind(contains_pattern(term))
        .bind(term.to_lowercase())
        .fetch_all(pool)
        .await
    }
}
