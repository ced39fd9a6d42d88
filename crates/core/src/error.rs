/// Domain-level error shared by the persistence and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid form submission: {0}")]
    Form(#[from] FormError),

    #[error("Conflict: {message}")]
    Conflict {
        reason: ConflictReason,
        message: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing entity looked up by any printable key.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn conflict(reason: ConflictReason, message: impl Into<String>) -> Self {
        Self::Conflict {
            reason,
            message: message.into(),
        }
    }
}

/// Rejections produced while validating admin and public form input.
///
/// Each variant has a stable machine-readable [`code`](FormError::code) that
/// is surfaced to the browser as the `?error=` flash value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("required fields are missing")]
    MissingFields,

    #[error("form body could not be read")]
    BadForm,

    #[error("slug must be lowercase letters and digits joined by single hyphens")]
    InvalidSlug,

    #[error("unknown status value")]
    BadStatus,

    #[error("malformed id")]
    BadId,

    #[error("referenced category does not exist")]
    UnknownCategory,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("reaction kind must be \"like\" or \"dislike\"")]
    BadReactionKind,
}

impl FormError {
    pub fn code(self) -> &'static str {
        match self {
            FormError::MissingFields => "missing_fields",
            FormError::BadForm => "bad_form",
            FormError::InvalidSlug => "invalid_slug",
            FormError::BadStatus => "bad_status",
            FormError::BadId => "bad_id",
            FormError::UnknownCategory => "unknown_category",
            FormError::InvalidEmail => "invalid_email",
            FormError::BadReactionKind => "bad_kind",
        }
    }
}

/// Why a mutation was refused because of existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// Another row of the same kind already owns the slug.
    SlugTaken,
    /// A category still has projects pointing at it.
    CategoryInUse,
}

impl ConflictReason {
    pub fn code(self) -> &'static str {
        match self {
            ConflictReason::SlugTaken => "slug_taken",
            ConflictReason::CategoryInUse => "category_in_use",
        }
    }
}
