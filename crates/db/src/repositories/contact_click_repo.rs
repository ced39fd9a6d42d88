//! Repository for the append-only `contact_clicks` table.

use sqlx::PgPool;

use crate::models::contact_click::{ContactClick, CreateContactClick, HrefCount};

const COLUMNS: &str = "id, href, referrer, user_agent, created_at";

pub struct ContactClickRepo;

impl ContactClickRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactClick,
    ) -> Result<ContactClick, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_clicks (href, referrer, user_agent)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactClick>(&query)
            .bind(&input.href)
            .bind(&input.referrer)
            .bind(&input.user_agent)
            .fetch_one(pool)
            .await
    }

    /// All-time click counts per destination, most clicked first.
    pub async fn counts_by_href(pool: &PgPool) -> Result<Vec<HrefCount>, sqlx::Error> {
        sqlx::query_as::<_, HrefCount>(
            "SELECT href, COUNT(*) AS count
             FROM contact_clicks
             GROUP BY href
             ORDER BY count DESC, href ASC",
        )
        .fetch_all(pool)
        .await
    }
}
