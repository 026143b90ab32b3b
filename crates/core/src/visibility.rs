//! Course visibility vocabulary.

use serde::{Deserialize, Serialize};

/// Valid course visibility strings (stored in `courses.visibility`).
pub const VISIBILITY_PUBLIC: &str = "public";
pub const VISIBILITY_PRIVATE: &str = "private";
pub const VISIBILITY_TARGETED: &str = "targeted";

/// All valid visibility values.
pub const VALID_VISIBILITIES: &[&str] =
    &[VISIBILITY_PUBLIC, VISIBILITY_PRIVATE, VISIBILITY_TARGETED];

/// Who may see a course in listings and open its detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible to every user.
    Public,
    /// Visible to the instructor and admins only.
    Private,
    /// Visible to students matched by the course's targeting criteria.
    Targeted,
}

impl Visibility {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            VISIBILITY_PUBLIC => Ok(Self::Public),
            VISIBILITY_PRIVATE => Ok(Self::Private),
            VISIBILITY_TARGETED => Ok(Self::Targeted),
            _ => Err(format!(
                "Invalid visibility '{s}'. Must be one of: {}",
                VALID_VISIBILITIES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => VISIBILITY_PUBLIC,
            Self::Private => VISIBILITY_PRIVATE,
            Self::Targeted => VISIBILITY_TARGETED,
        }
    }
}
