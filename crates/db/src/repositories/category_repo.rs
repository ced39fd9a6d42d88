//! Repository for the `categories` table.

use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CategoryInput};

const COLUMNS: &str = "id, name, slug, sort_order, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create(pool: &PgPool, input: &CategoryInput) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, sort_order)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All categories in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY sort_order ASC, name ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Replace a category's fields. Returns `None` if no row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CategoryInput,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = $2,
                slug = $3,
                sort_order = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Callers must check it is unused first.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether any category other than the one at `except` uses `slug`.
    pub async fn slug_taken(
        pool: &PgPool,
        slug: &str,
        except: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM categories WHERE slug = $1 AND ($2::TEXT IS NULL OR slug <> $2)
             )",
        )
        .bind(slug)
        .bind(except)
        .fetch_one(pool)
        .await
    }
}
