//! Enrollment entity model.

use serde::Serialize;
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// An enrollment row from the `enrollments` table.
///
/// Existence of a row authorizes the student to view gated course content.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub course_id: DbId,
    pub student_id: DbId,
    pub enrolled_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// An enrollment joined with course info and lesson-progress counts, for
/// the student dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EnrollmentProgress {
    pub course_id: DbId,
    pub course_title: String,
    pub course_slug: String,
    pub thumbnail_url: Option<String>,
    pub enrolled_at: Timestamp,
    pub total_lessons: i64,
    pub completed_lessons: i64,
}
