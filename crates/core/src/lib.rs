//! Domain logic for the folio portfolio backend.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and
//! `api` crates build on these types and functions.

pub mod analytics;
pub mod content;
pub mod device;
pub mod error;
pub mod export;
pub mod feed;
pub mod rate_limit;
pub mod types;
pub mod validation;
