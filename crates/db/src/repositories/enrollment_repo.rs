//! Repository for the `enrollments` table.

use sqlx::PgPool;
use stepwise_core::types::DbId;

use crate::models::enrollment::Enrollment;

/// Column list for `enrollments` queries.
const COLUMNS: &str = "id, course_id, student_id, enrolled_at, completed_at";

/// Provides enrollment checks and writes.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll a student. The `uq_enrollments_course_student` constraint
    /// rejects a second enrollment in the same course.
    pub async fn create(
        pool: &PgPool,
        course_id: DbId,
        student_id: DbId,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (course_id, student_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(course_id)
            .bind(student_id)
            .fetch_one(pool)
            .await
    }

    /// Find a student's enrollment in a course.
    pub async fn find(
        pool: &PgPool,
        course_id: DbId,
        student_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE course_id = $1 AND student_id = $2"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(course_id)
            .bind(student_id)
            .fetch_optional(pool)
            .await
    }

    /// Drop a student's enrollment.
    pub async fn delete(
        pool: &PgPool,
        course_id: DbId,
        student_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM enrollments WHERE course_id = $1 AND student_id = $2")
                .bind(course_id)
                .bind(student_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a course's enrollments.
    pub async fn count_by_course(pool: &PgPool, course_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(pool)
            .await
    }
}
