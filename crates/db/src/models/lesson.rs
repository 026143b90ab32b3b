//! Lesson entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// A lesson row from the `lessons` table.
///
/// `uq_lessons_module` guarantees at most one lesson per module.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub module_id: DbId,
    pub title: String,
    pub content: Option<String>,
    pub content_type: String,
    pub media_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting a module's lesson.
#[derive(Debug, Deserialize)]
pub struct UpsertLesson {
    pub title: String,
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub duration_seconds: Option<i32>,
}
