//! HTTP handlers, one module per resource.

pub mod admin_categories;
pub mod admin_pages;
pub mod admin_projects;
pub mod analytics;
pub mod categories;
pub mod feeds;
pub mod pages;
pub mod projects;
pub mod reactions;
pub mod slugs;
pub mod subscribe;
pub mod tracking;
