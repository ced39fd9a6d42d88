//! Anonymous visitor token.
//!
//! An opaque UUID handed out in a long-lived cookie on first contact and
//! read back on later requests. It groups reactions and views per browser;
//! it is not an authentication mechanism.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::{IntoResponseParts, ResponseParts};
use uuid::Uuid;

use super::cookie_value;
use crate::state::AppState;

pub const VISITOR_COOKIE: &str = "folio_vid";

/// One year.
const VISITOR_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// The caller's visitor token.
///
/// Returning it as part of a response sets the cookie when the token was
/// minted for this request, and does nothing otherwise.
#[derive(Debug, Clone)]
pub struct VisitorToken {
    pub id: String,
    /// `Some(secure)` when the token is new and must be sent to the client.
    issue: Option<bool>,
}

impl VisitorToken {
    pub fn is_new(&self) -> bool {
        self.issue.is_some()
    }

    fn set_cookie(&self, secure: bool) -> String {
        let mut cookie = format!(
            "{VISITOR_COOKIE}={}; Path=/; Max-Age={VISITOR_COOKIE_MAX_AGE_SECS}; HttpOnly; SameSite=Lax",
            self.id
        );
        if secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

impl FromRequestParts<AppState> for VisitorToken {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let existing = cookie_value(&parts.headers, VISITOR_COOKIE)
            .and_then(|value| Uuid::parse_str(&value).ok());

        Ok(match existing {
            Some(id) => VisitorToken {
                id: id.to_string(),
                issue: None,
            },
            None => VisitorToken {
                id: Uuid::new_v4().to_string(),
                issue: Some(state.config.visitor_cookie_secure),
            },
        })
    }
}

impl IntoResponseParts for VisitorToken {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(secure) = self.issue {
            // Only UUID characters and fixed attributes, always a valid header.
            if let Ok(value) = HeaderValue::from_str(&self.set_cookie(secure)) {
                res.headers_mut().append(SET_COOKIE, value);
            }
        }
        Ok(res)
    }
}
