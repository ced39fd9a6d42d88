//! Repository for the `pages` table.

use folio_core::content::PageStatus;
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::{Page, PageInput};

const COLUMNS: &str = "id, slug, title, content, excerpt, status, created_at, updated_at";

/// Provides CRUD operations for static pages.
pub struct PageRepo;

impl PageRepo {
    pub async fn create(pool: &PgPool, input: &PageInput) -> Result<Page, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages (slug, title, content, excerpt, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.excerpt)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a page by slug, hiding drafts.
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE slug = $1 AND status = $2");
        sqlx::query_as::<_, Page>(&query)
            .bind(slug)
            .bind(PageStatus::Published.as_str())
            .fetch_optional(pool)
            .await
    }

    /// All pages, drafts included, alphabetically by title.
    pub async fn list(pool: &PgPool) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages ORDER BY title ASC, id ASC");
        sqlx::query_as::<_, Page>(&query).fetch_all(pool).await
    }

    /// Published pages only, for the sitemap.
    pub async fn list_published(pool: &PgPool) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE status = $1 ORDER BY slug ASC");
        sqlx::query_as::<_, Page>(&query)
            .bind(PageStatus::Published.as_str())
            .fetch_all(pool)
            .await
    }

    /// Replace a page's fields. Returns `None` if no row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &PageInput,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                slug = $2,
                title = $3,
                content = $4,
                excerpt = $5,
                status = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.excerpt)
            .bind(input.status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether any page other than the one at `except` uses `slug`.
    pub async fn slug_taken(
        pool: &PgPool,
        slug: &str,
        except: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM pages WHERE slug = $1 AND ($2::TEXT IS NULL OR slug <> $2)
             )",
        )
        .bind(slug)
        .bind(except)
        .fetch_one(pool)
        .await
    }
}
