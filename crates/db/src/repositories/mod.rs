//! Repository layer: one zero-sized struct per table with async associated
//! functions taking a `&PgPool`.

pub mod category_repo;
pub mod contact_click_repo;
pub mod page_repo;
pub mod project_repo;
pub mod project_view_repo;
pub mod rate_limit_repo;
pub mod reaction_repo;
pub mod subscriber_repo;

pub use category_repo::CategoryRepo;
pub use contact_click_repo::ContactClickRepo;
pub use page_repo::PageRepo;
pub use project_repo::ProjectRepo;
pub use project_view_repo::ProjectViewRepo;
pub use rate_limit_repo::RateLimitRepo;
pub use reaction_repo::ReactionRepo;
pub use subscriber_repo::SubscriberRepo;

/// Build an `ILIKE` pattern matching `needle` anywhere, with `%`, `_` and
/// `\` in the needle taken literally.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
