//! Admin form payloads and their validation into repository inputs.
//!
//! Forms arrive as `application/x-www-form-urlencoded` with every field
//! optional; validation trims, applies defaults and reports the first
//! problem as a [`FormError`]. Checks that need the database (category
//! existence, slug uniqueness) happen in the handlers.

use folio_core::content::{PageStatus, ProjectStatus};
use folio_core::error::FormError;
use folio_core::types::DbId;
use folio_core::validation::{is_valid_slug, normalize_slug, parse_int_or, split_csv};
use folio_db::models::category::CategoryInput;
use folio_db::models::page::PageInput;
use folio_db::models::project::ProjectInput;
use serde::Deserialize;

/// Sort position for projects created without one; sorts after curated entries.
pub const DEFAULT_PROJECT_SORT_ORDER: i64 = 999;

/// Trimmed value, or `None` when absent or blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>) -> Result<String, FormError> {
    non_blank(value).ok_or(FormError::MissingFields)
}

fn to_i32(value: i64, fallback: i32) -> i32 {
    i32::try_from(value).unwrap_or(fallback)
}

/// Normalize a submitted slug and check the result is usable.
pub fn clean_slug(raw: Option<String>) -> Result<String, FormError> {
    let slug = normalize_slug(&required(raw)?);
    if is_valid_slug(&slug) {
        Ok(slug)
    } else {
        Err(FormError::InvalidSlug)
    }
}

/// Parse a path id. Ids are positive.
pub fn parse_id(raw: &str) -> Result<DbId, FormError> {
    match raw.trim().parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(FormError::BadId),
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ProjectForm {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub year: Option<String>,
    #[serde(alias = "sortOrder")]
    pub sort_order: Option<String>,
    pub tags: Option<String>,
    #[serde(alias = "techStack")]
    pub tech_stack: Option<String>,
    /// Category id, or blank for none.
    #[serde(alias = "categoryId")]
    pub category: Option<String>,
    #[serde(alias = "githubUrl")]
    pub github_url: Option<String>,
    #[serde(alias = "liveUrl")]
    pub live_url: Option<String>,
    /// Checkbox: present means checked, whatever the value.
    pub featured: Option<String>,
    #[serde(alias = "coverImageUrl")]
    pub cover_image_url: Option<String>,
}

impl ProjectForm {
    /// Validate into a project input. `current_year` fills a missing year.
    pub fn validate(self, current_year: i32) -> Result<ProjectInput, FormError> {
        let title = required(self.title)?;
        let slug = clean_slug(self.slug)?;

        let status = match non_blank(self.status) {
            Some(raw) => raw.parse::<ProjectStatus>().map_err(|_| FormError::BadStatus)?,
            None => ProjectStatus::default(),
        };

        let category_id = match non_blank(self.category) {
            Some(raw) => Some(parse_id(&raw).map_err(|_| FormError::UnknownCategory)?),
            None => None,
        };

        Ok(ProjectInput {
            slug,
            title,
            subtitle: non_blank(self.subtitle),
            description: non_blank(self.description).unwrap_or_default(),
            content: non_blank(self.content),
            status,
            year: to_i32(
                parse_int_or(self.year.as_deref(), i64::from(current_year)),
                current_year,
            ),
            tags: split_csv(self.tags.as_deref()),
            tech_stack: split_csv(self.tech_stack.as_deref()),
            category_id,
            sort_order: to_i32(
                parse_int_or(self.sort_order.as_deref(), DEFAULT_PROJECT_SORT_ORDER),
                DEFAULT_PROJECT_SORT_ORDER as i32,
            ),
            featured: self.featured.is_some(),
            github_url: non_blank(self.github_url),
            live_url: non_blank(self.live_url),
            cover_image_url: non_blank(self.cover_image_url),
        })
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(alias = "sortOrder")]
    pub sort_order: Option<String>,
}

impl CategoryForm {
    pub fn validate(self) -> Result<CategoryInput, FormError> {
        let name = required(self.name)?;
        let slug = clean_slug(self.slug)?;
        Ok(CategoryInput {
            name,
            slug,
            sort_order: to_i32(parse_int_or(self.sort_order.as_deref(), 0), 0),
        })
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PageForm {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub status: Option<String>,
}

impl PageForm {
    pub fn validate(self) -> Result<PageInput, FormError> {
        let title = required(self.title)?;
        let slug = clean_slug(self.slug)?;

        let status = match non_blank(self.status) {
            Some(raw) => raw.parse::<PageStatus>().map_err(|_| FormError::BadStatus)?,
            None => PageStatus::default(),
        };

        Ok(PageInput {
            slug,
            title,
            content: non_blank(self.content).unwrap_or_default(),
            excerpt: non_blank(self.excerpt),
            status,
        })
    }
}
