//! Admin session extractor.
//!
//! Unlike the JSON endpoints, an unauthenticated admin request is not
//! answered with 401/403: the caller is sent to the external sign-in page
//! with a callback back to the admin dashboard.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};

use super::cookie_value;
use crate::auth::jwt::validate_token;
use crate::state::AppState;

/// Cookie holding the admin session token.
pub const ADMIN_COOKIE: &str = "folio_admin";

/// Where the sign-in page returns to after a successful login
/// (`/admin`, already percent-encoded).
const CALLBACK_QUERY: &str = "callbackUrl=%2Fadmin";

/// A verified, allow-listed admin.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub email: String,
}

/// Rejection for [`AdminSession`]: a 303 to the sign-in page.
#[derive(Debug)]
pub struct SignInRedirect {
    location: String,
}

impl SignInRedirect {
    fn new(sign_in_url: &str) -> Self {
        let separator = if sign_in_url.contains('?') { '&' } else { '?' };
        Self {
            location: format!("{sign_in_url}{separator}{CALLBACK_QUERY}"),
        }
    }
}

impl IntoResponse for SignInRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.location).into_response()
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = SignInRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = &state.config.admin;
        let reject = || SignInRedirect::new(&admin.sign_in_url);

        let token = bearer_token(parts)
            .or_else(|| cookie_value(&parts.headers, ADMIN_COOKIE))
            .ok_or_else(reject)?;

        let claims = validate_token(&token, &admin.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected admin token");
            reject()
        })?;

        if !admin.is_allowed(&claims.sub) {
            tracing::warn!(email = %claims.sub, "Admin token for address not on allow-list");
            return Err(reject());
        }

        Ok(AdminSession { email: claims.sub })
    }
}
