//! Shared response envelope types for API handlers.
//!
//! Read endpoints wrap their payload in `{ "data": ... }`; the public write
//! endpoints answer with an `{ "ok": ... }` acknowledgement.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "ok": true }` acknowledgement for fire-and-forget writes.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub const fn ok() -> Self {
        Self { ok: true }
    }
}
