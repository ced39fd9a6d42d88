//! Fixed-window rate limiting for the public write endpoints.
//!
//! The window arithmetic lives in [`folio_core::rate_limit`]; this module
//! supplies the counter stores behind a trait so the backend can be chosen
//! at startup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::error::CoreError;
use folio_core::rate_limit::RateLimitRule;
use folio_db::repositories::RateLimitRepo;
use folio_db::DbPool;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, RedisError};

use crate::config::RateLimitBackend;
use crate::error::{AppError, AppResult};

/// A counter store for fixed-window limits.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request from `client` under `rule`; `true` if it is allowed.
    async fn check(&self, rule: &RateLimitRule, client: &str) -> AppResult<bool>;
}

/// Counters in the `rate_limit_windows` table, one row per key and window.
pub struct PgRateLimiter {
    pool: DbPool,
}

impl PgRateLimiter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimiter for PgRateLimiter {
    async fn check(&self, rule: &RateLimitRule, client: &str) -> AppResult<bool> {
        let now = Utc::now();
        let key = rule.key(client);
        let window = rule.window_index(now.timestamp());
        let expires_at = DateTime::<Utc>::from_timestamp(rule.window_end(window), 0)
            .ok_or_else(|| AppError::InternalError("rate limit window out of range".into()))?;

        let hits = RateLimitRepo::hit(&self.pool, &key, window, expires_at).await?;

        // The first hit of a window is a cheap moment to drop stale windows.
        if hits == 1 {
            if let Err(e) = RateLimitRepo::purge_expired_for_key(&self.pool, &key, now).await {
                tracing::warn!(error = %e, key = %key, "Failed to purge expired rate limit windows");
            }
        }

        let allowed = rule.allows(hits);
        if !allowed {
            tracing::info!(key = %key, hits, limit = rule.limit, "Rate limit exceeded");
        }
        Ok(allowed)
    }
}

/// Counters in Redis: one `INCR` per request on a key per client and
/// window, expiring with the window.
#[derive(Clone)]
pub struct RedisRateLimiter {
    connection: ConnectionManager,
}

impl RedisRateLimiter {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

/// Open a managed Redis connection that reconnects on failure.
pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, RedisError> {
    let config = ConnectionManagerConfig::new().set_number_of_retries(1);

    let client = Client::open(redis_url)?;
    client.get_connection_manager_with_config(config).await
}

/// Redis key for `client` under `rule` in the given window.
fn redis_window_key(rule: &RateLimitRule, client: &str, window: i64) -> String {
    format!("rl:{}:{window}", rule.key(client))
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, rule: &RateLimitRule, client: &str) -> AppResult<bool> {
        let window = rule.window_index(Utc::now().timestamp());
        let key = redis_window_key(rule, client, window);
        let mut connection = self.connection.clone();

        let hits: i64 = connection.incr(&key, 1).await.map_err(redis_failure)?;
        if hits == 1 {
            let _: () = connection
                .expire(&key, rule.window_secs)
                .await
                .map_err(redis_failure)?;
        }

        let allowed = rule.allows(hits);
        if !allowed {
            tracing::info!(key = %key, hits, limit = rule.limit, "Rate limit exceeded");
        }
        Ok(allowed)
    }
}

fn redis_failure(error: RedisError) -> AppError {
    tracing::error!(error = %error, "Redis rate limit counter failed");
    AppError::InternalError("rate limit store unavailable".into())
}

/// Allows everything. Used when no counter store is configured.
pub struct NoopRateLimiter;

#[async_trait]
impl RateLimiter for NoopRateLimiter {
    async fn check(&self, _rule: &RateLimitRule, _client: &str) -> AppResult<bool> {
        Ok(true)
    }
}

/// Build the limiter selected by configuration. Connects to Redis when
/// that backend is chosen.
pub async fn build_rate_limiter(
    backend: &RateLimitBackend,
    pool: DbPool,
) -> Result<Arc<dyn RateLimiter>, RedisError> {
    Ok(match backend {
        RateLimitBackend::Redis { url } => Arc::new(RedisRateLimiter::new(init_redis(url).await?)),
        RateLimitBackend::Postgres => Arc::new(PgRateLimiter::new(pool)),
        RateLimitBackend::Disabled => Arc::new(NoopRateLimiter),
    })
}

/// Count the request and fail with 429 once the client is over the limit.
pub async fn enforce(
    limiter: &dyn RateLimiter,
    rule: &RateLimitRule,
    client: &str,
) -> AppResult<()> {
    if limiter.check(rule, client).await? {
        Ok(())
    } else {
        Err(CoreError::RateLimited.into())
    }
}
