//! Best-effort client address for rate limiting.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Used when no proxy header names the client.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Client address as reported by the fronting proxy: the first hop of
/// `X-Forwarded-For`, else `X-Real-IP`, else [`UNKNOWN_CLIENT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let forwarded = header("x-forwarded-for")
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty());

        let ip = forwarded
            .or_else(|| header("x-real-ip"))
            .unwrap_or(UNKNOWN_CLIENT);
        ClientIp(ip.to_string())
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp::from_headers(&parts.headers))
    }
}
