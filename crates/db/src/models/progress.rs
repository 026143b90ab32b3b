//! Lesson-progress entity model.

use serde::Serialize;
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// A lesson-progress row, unique per (lesson, student).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LessonProgress {
    pub id: DbId,
    pub lesson_id: DbId,
    pub student_id: DbId,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
}
