//! Closed vocabularies stored as text columns.
//!
//! Each enum round-trips through its canonical string form via
//! [`as_str`](ProjectStatus::as_str) and `TryFrom<String>`, which is what
//! the `db` crate relies on for `#[sqlx(try_from = "String")]`.

use serde::{Deserialize, Serialize};

/// Returned when a stored or submitted string is not part of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::content::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::content::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::content::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use text_enum;

/// Publication state of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "Completed")]
    Completed,
    #[default]
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Draft")]
    Draft,
}

text_enum!(ProjectStatus, "project status", {
    Completed => "Completed",
    InProgress => "In Progress",
    Draft => "Draft",
});

/// Visibility of a static page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Published,
    Draft,
}

text_enum!(PageStatus, "page status", {
    Published => "published",
    Draft => "draft",
});

/// A visitor's opinion of a project. One active value per visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

text_enum!(ReactionKind, "reaction kind", {
    Like => "like",
    Dislike => "dislike",
});

/// Kinds of slug-bearing entities the admin slug checker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugScope {
    Project,
    Category,
    Page,
}

text_enum!(SlugScope, "slug scope", {
    Project => "project",
    Category => "category",
    Page => "page",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_status_round_trips_through_text() {
        for status in ProjectStatus::ALL {
            assert_eq!(status.as_str().parse::<ProjectStatus>(), Ok(*status));
        }
        assert_eq!(ProjectStatus::InProgress.as_str(), "In Progress");
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "in progress".parse::<ProjectStatus>().unwrap_err();
        assert_eq!(err.kind, "project status");
        assert!("Published".parse::<PageStatus>().is_err());
        assert!("LIKE".parse::<ReactionKind>().is_err());
    }

    #[test]
    fn serde_uses_canonical_text() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(serde_json::to_string(&ReactionKind::Dislike).unwrap(), "\"dislike\"");
        let kind: ReactionKind = serde_json::from_str("\"like\"").unwrap();
        assert_eq!(kind, ReactionKind::Like);
    }

    #[test]
    fn defaults_match_form_defaults() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::InProgress);
        assert_eq!(PageStatus::default(), PageStatus::Published);
    }
}
