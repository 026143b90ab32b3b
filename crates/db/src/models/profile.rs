//! Profile entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// A profile row from the `profiles` table (1:1 with users).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub user_id: DbId,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    /// Registration number.
    pub regno: Option<String>,
    pub year: Option<String>,
    pub section: Option<String>,
    pub department: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating a profile. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub regno: Option<String>,
    pub year: Option<String>,
    pub section: Option<String>,
    pub department: Option<String>,
}
