//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - An input DTO for inserts and full-replace updates
//! - Any aggregate row shapes the analytics queries return

pub mod category;
pub mod contact_click;
pub mod page;
pub mod project;
pub mod project_view;
pub mod reaction;
pub mod subscriber;
