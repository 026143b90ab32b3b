//! Repository for the `lesson_progress` table.

use sqlx::PgPool;
use stepwise_core::types::DbId;

use crate::models::progress::LessonProgress;

/// Column list for `lesson_progress` queries.
const COLUMNS: &str = "id, lesson_id, student_id, completed, completed_at";

/// Provides lesson-completion reads and the completion upsert.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Mark a lesson complete for a student.
    ///
    /// `uq_lesson_progress_lesson_student` makes this idempotent: a second
    /// call updates the existing row instead of inserting another.
    pub async fn mark_completed(
        pool: &PgPool,
        lesson_id: DbId,
        student_id: DbId,
    ) -> Result<LessonProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO lesson_progress (lesson_id, student_id, completed, completed_at)
             VALUES ($1, $2, TRUE, now())
             ON CONFLICT (lesson_id, student_id) DO UPDATE
             SET completed = TRUE, completed_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(lesson_id)
            .bind(student_id)
            .fetch_one(pool)
            .await
    }

    /// Batch-load a student's progress rows for the given lessons.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
        lesson_ids: &[DbId],
    ) -> Result<Vec<LessonProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lesson_progress
             WHERE student_id = $1 AND lesson_id = ANY($2)"
        );
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(student_id)
            .bind(lesson_ids)
            .fetch_all(pool)
            .await
    }
}
