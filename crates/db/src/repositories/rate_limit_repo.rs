//! Fixed-window counters in `rate_limit_windows`.

use folio_core::types::Timestamp;
use sqlx::PgPool;

pub struct RateLimitRepo;

impl RateLimitRepo {
    /// Count one hit against `(key, window_index)` and return the new total.
    ///
    /// The first hit creates the row; concurrent hits serialise on the
    /// primary key so the returned totals are strictly increasing.
    pub async fn hit(
        pool: &PgPool,
        key: &str,
        window_index: i64,
        expires_at: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO rate_limit_windows (key, window_index, hits, expires_at)
             VALUES ($1, $2, 1, $3)
             ON CONFLICT (key, window_index)
             DO UPDATE SET hits = rate_limit_windows.hits + 1
             RETURNING hits",
        )
        .bind(key)
        .bind(window_index)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// Drop this key's windows that ended before `now`.
    pub async fn purge_expired_for_key(
        pool: &PgPool,
        key: &str,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rate_limit_windows WHERE key = $1 AND expires_at <= $2")
            .bind(key)
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
