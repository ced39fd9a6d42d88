//! Request extractors that don't need application state.

use std::convert::Infallible;

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use folio_core::error::FormError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

/// JSON body extractor that reports every rejection (bad syntax, wrong
/// shape, missing content type) as a 400 with the standard error body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected JSON body");
    AppError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
}

/// Admin form body, read from either `application/x-www-form-urlencoded`
/// or `multipart/form-data`.
///
/// Never rejects. A body that cannot be read (wrong content type, repeated
/// field, broken multipart framing) is carried as [`FormError::BadForm`] so
/// the handler answers with its usual flash reply. File parts are skipped.
#[derive(Debug)]
pub struct AdminForm<T>(pub Result<T, FormError>);

impl<S, T> FromRequest<S> for AdminForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let form = if is_multipart(req.headers()) {
            read_multipart(req, state).await
        } else {
            match axum::Form::<T>::from_request(req, state).await {
                Ok(axum::Form(value)) => Ok(value),
                Err(rejection) => {
                    tracing::debug!(error = %rejection.body_text(), "Rejected admin form");
                    Err(FormError::BadForm)
                }
            }
        };
        Ok(AdminForm(form))
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("multipart/form-data"))
}

async fn read_multipart<S, T>(req: Request, state: &S) -> Result<T, FormError>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    let mut multipart = Multipart::from_request(req, state).await.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected multipart form");
        FormError::BadForm
    })?;

    let mut fields = Map::new();
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }

        let text = field.text().await.map_err(bad_multipart)?;
        if fields.insert(name.clone(), Value::String(text)).is_some() {
            tracing::debug!(field = %name, "Repeated multipart field");
            return Err(FormError::BadForm);
        }
    }

    serde_json::from_value(Value::Object(fields)).map_err(|e| {
        tracing::debug!(error = %e, "Multipart fields do not fit the form");
        FormError::BadForm
    })
}

fn bad_multipart(error: MultipartError) -> FormError {
    tracing::debug!(error = %error, "Malformed multipart body");
    FormError::BadForm
}

/// How the caller wants admin mutation results delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Browser form post: answer with a redirect carrying a flash code.
    Redirect,
    /// Script client sent `Accept: application/json`.
    Json,
}

impl ResponseFormat {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let wants_json = headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .any(|media| {
                media
                    .split(';')
                    .next()
                    .is_some_and(|ty| ty.trim().eq_ignore_ascii_case("application/json"))
            });

        if wants_json {
            ResponseFormat::Json
        } else {
            ResponseFormat::Redirect
        }
    }
}

impl<S> FromRequestParts<S> for ResponseFormat
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ResponseFormat::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(accept: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(ACCEPT, HeaderValue::from_str(accept).unwrap());
        map
    }

    #[test]
    fn browsers_get_redirects() {
        assert_eq!(
            ResponseFormat::from_headers(&headers(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
            )),
            ResponseFormat::Redirect
        );
        assert_eq!(ResponseFormat::from_headers(&HeaderMap::new()), ResponseFormat::Redirect);
    }

    #[test]
    fn detects_multipart_bodies() {
        let mut map = HeaderMap::new();
        map.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("Multipart/Form-Data; boundary=xyz"),
        );
        assert!(is_multipart(&map));

        map.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert!(!is_multipart(&map));
        assert!(!is_multipart(&HeaderMap::new()));
    }

    #[test]
    fn json_clients_get_json() {
        assert_eq!(
            ResponseFormat::from_headers(&headers("application/json")),
            ResponseFormat::Json
        );
        assert_eq!(
            ResponseFormat::from_headers(&headers("text/plain, Application/JSON; q=0.5")),
            ResponseFormat::Json
        );
    }
}
