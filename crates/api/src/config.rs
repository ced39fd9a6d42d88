use folio_core::feed::SiteInfo;
use folio_core::validation::split_csv;

use crate::auth::jwt::JwtConfig;

/// Deployment mode. Anything other than `production` is treated as
/// development, which enables verbose error diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            AppEnv::Production
        } else {
            AppEnv::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }
}

/// Where fixed-window rate-limit counters live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitBackend {
    /// `INCR`/`EXPIRE` counters in Redis.
    Redis { url: String },
    /// Counters in the `rate_limit_windows` table.
    Postgres,
    /// Every request is allowed.
    Disabled,
}

impl RateLimitBackend {
    /// Pick the backend from `RATE_LIMIT_BACKEND` and `REDIS_URL`.
    ///
    /// With no explicit backend, a configured `REDIS_URL` selects Redis and
    /// its absence selects Postgres.
    fn select(backend: Option<&str>, redis_url: Option<&str>) -> Self {
        let redis_url = redis_url.map(str::trim).filter(|url| !url.is_empty());
        let backend = backend.map(|b| b.trim().to_ascii_lowercase());

        match (backend.as_deref(), redis_url) {
            (None | Some(""), Some(url)) => RateLimitBackend::Redis { url: url.to_string() },
            (None | Some(""), None) => RateLimitBackend::Postgres,
            (Some("redis"), Some(url)) => RateLimitBackend::Redis { url: url.to_string() },
            (Some("redis"), None) => panic!("RATE_LIMIT_BACKEND=redis requires REDIS_URL"),
            (Some("postgres" | "pg"), _) => RateLimitBackend::Postgres,
            (Some("none" | "off" | "disabled"), _) => RateLimitBackend::Disabled,
            (Some(other), _) => {
                panic!("RATE_LIMIT_BACKEND must be `redis`, `postgres` or `none`, got '{other}'")
            }
        }
    }

    /// Backend name for logs; never includes the Redis URL.
    pub fn name(&self) -> &'static str {
        match self {
            RateLimitBackend::Redis { .. } => "redis",
            RateLimitBackend::Postgres => "postgres",
            RateLimitBackend::Disabled => "none",
        }
    }
}

/// Admin gate settings.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Signing settings for admin session tokens.
    pub jwt: JwtConfig,
    /// Lower-cased addresses allowed into the admin surface. Empty means any
    /// holder of a valid token.
    pub allowed_emails: Vec<String>,
    /// External sign-in page unauthenticated admin requests are sent to.
    pub sign_in_url: String,
}

impl AdminConfig {
    pub fn is_allowed(&self, email: &str) -> bool {
        self.allowed_emails.is_empty()
            || self
                .allowed_emails
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(email))
    }
}

/// Analytics report window limits, in days.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsConfig {
    pub max_range_days: i64,
    pub default_range_days: i64,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the admin token secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub env: AppEnv,
    /// Public site metadata used by feeds and the sitemap.
    pub site: SiteInfo,
    pub admin: AdminConfig,
    pub analytics: AnalyticsConfig,
    pub rate_limit_backend: RateLimitBackend,
    /// Whether the visitor cookie carries the `Secure` attribute.
    pub visitor_cookie_secure: bool,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn env_parse<T>(name: &str, default: &str) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env_or(name, default);
    raw.trim()
        .parse()
        .unwrap_or_else(|e| panic!("{name} must be valid, got '{raw}': {e}"))
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                          |
    /// |--------------------------------|----------------------------------|
    /// | `HOST`                         | `0.0.0.0`                        |
    /// | `PORT`                         | `3000`                           |
    /// | `CORS_ORIGINS`                 | `http://localhost:3000`          |
    /// | `REQUEST_TIMEOUT_SECS`         | `30`                             |
    /// | `APP_ENV`                      | `development`                    |
    /// | `SITE_URL`                     | `http://localhost:3000`          |
    /// | `SITE_TITLE`                   | `Portfolio`                      |
    /// | `SITE_DESCRIPTION`             | `Projects and case studies`      |
    /// | `SITE_LANGUAGE`                | `en`                             |
    /// | `ADMIN_EMAILS`                 | empty (any valid token)          |
    /// | `SIGN_IN_URL`                  | `/api/auth/signin`               |
    /// | `ANALYTICS_MAX_RANGE_DAYS`     | `90`                             |
    /// | `ANALYTICS_DEFAULT_RANGE_DAYS` | `30`                             |
    /// | `RATE_LIMIT_BACKEND`           | `redis` if `REDIS_URL` is set, else `postgres` |
    /// | `REDIS_URL`                    | unset                            |
    /// | `VISITOR_COOKIE_SECURE`        | `true` in production, else false |
    ///
    /// Token settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on any malformed value so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = env_parse("PORT", "3000");

        let cors_origins = split_csv(Some(&env_or("CORS_ORIGINS", "http://localhost:3000")));
        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", "30");

        let env = AppEnv::parse(&env_or("APP_ENV", "development"));

        let site = SiteInfo {
            base_url: env_or("SITE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            title: env_or("SITE_TITLE", "Portfolio"),
            description: env_or("SITE_DESCRIPTION", "Projects and case studies"),
            language: env_or("SITE_LANGUAGE", "en"),
        };

        let admin = AdminConfig {
            jwt: JwtConfig::from_env(),
            allowed_emails: split_csv(std::env::var("ADMIN_EMAILS").ok().as_deref())
                .into_iter()
                .map(|email| email.to_lowercase())
                .collect(),
            sign_in_url: env_or("SIGN_IN_URL", "/api/auth/signin"),
        };

        let analytics = AnalyticsConfig {
            max_range_days: env_parse("ANALYTICS_MAX_RANGE_DAYS", "90"),
            default_range_days: env_parse("ANALYTICS_DEFAULT_RANGE_DAYS", "30"),
        };
        assert!(analytics.max_range_days > 0, "ANALYTICS_MAX_RANGE_DAYS must be positive");

        let rate_limit_backend = RateLimitBackend::select(
            std::env::var("RATE_LIMIT_BACKEND").ok().as_deref(),
            std::env::var("REDIS_URL").ok().as_deref(),
        );

        let default_secure = if env.is_production() { "true" } else { "false" };
        let visitor_cookie_secure: bool = env_parse("VISITOR_COOKIE_SECURE", default_secure);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            env,
            site,
            admin,
            analytics,
            rate_limit_backend,
            visitor_cookie_secure,
        }
    }
}
