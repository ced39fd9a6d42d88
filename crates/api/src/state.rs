use std::sync::Arc;

use crate::config::ServerConfig;
use crate::rate_limit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: folio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fixed-window limiter for the public write endpoints.
    pub rate_limiter: Arc<dyn RateLimiter>,
}
