use axum::extract::State;
use axum::Json;
use folio_core::error::{CoreError, FormError};
use folio_core::rate_limit::SUBSCRIBE;
use folio_core::validation::is_valid_email;
use folio_db::repositories::SubscriberRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::client_ip::ClientIp;
use crate::rate_limit::enforce;
use crate::response::OkResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

/// POST /api/subscribe
///
/// Add an address to the newsletter list. Subscribing twice is not an error.
pub async fn subscribe(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    JsonBody(body): JsonBody<SubscribeRequest>,
) -> AppResult<Json<OkResponse>> {
    enforce(state.rate_limiter.as_ref(), &SUBSCRIBE, &ip).await?;

    let email = body
        .email
        .map(|raw| raw.trim().to_lowercase())
        .filter(|email| is_valid_email(email))
        .ok_or(CoreError::Form(FormError::InvalidEmail))?;

    let inserted = SubscriberRepo::subscribe(&state.pool, &email).await?;
    tracing::info!(new = inserted, "Newsletter subscription");

    Ok(Json(OkResponse::ok()))
}
