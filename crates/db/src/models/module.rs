//! Module ("step") entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// A module row from the `modules` table. One module is one gated step.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Module {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Defines the linear step order within a course.
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a module.
#[derive(Debug, Deserialize)]
pub struct CreateModule {
    pub course_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
}

/// DTO for updating a module. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateModule {
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<i32>,
}
