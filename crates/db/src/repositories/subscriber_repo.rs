//! Repository for the `newsletter_subscribers` table.

use sqlx::PgPool;

use crate::models::subscriber::NewsletterSubscriber;

const COLUMNS: &str = "id, email, created_at";

pub struct SubscriberRepo;

impl SubscriberRepo {
    /// Add an address. Re-subscribing is a no-op; returns `true` only when
    /// a new row was inserted.
    pub async fn subscribe(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO newsletter_subscribers (email)
             VALUES ($1)
             ON CONFLICT ON CONSTRAINT uq_newsletter_subscribers_email DO NOTHING",
        )
        .bind(email)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<NewsletterSubscriber>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM newsletter_subscribers WHERE email = $1");
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
