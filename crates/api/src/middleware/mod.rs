//! Request extractors carrying per-request identity: the admin session, the
//! anonymous visitor token and the client address.

pub mod admin;
pub mod client_ip;
pub mod visitor;

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Value of the first cookie called `name` across all `Cookie` headers.
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; folio_vid=abc"));
        headers.append(COOKIE, HeaderValue::from_static("folio_admin=\"tok\""));

        assert_eq!(cookie_value(&headers, "folio_vid").as_deref(), Some("abc"));
        assert_eq!(cookie_value(&headers, "folio_admin").as_deref(), Some("tok"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("folio_vid="));
        assert_eq!(cookie_value(&headers, "folio_vid"), None);
    }
}
