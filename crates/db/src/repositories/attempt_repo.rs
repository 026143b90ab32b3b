//! Repository for the `quiz_attempts` and `question_responses` tables.

use sqlx::PgPool;
use stepwise_core::grading::QuizGrade;
use stepwise_core::types::DbId;

use crate::models::attempt::{
    LatestAttempt, QuestionResponse, QuizAttempt, ATTEMPT_STATUS_SUBMITTED,
};

/// Column list for `quiz_attempts` queries.
const ATTEMPT_COLUMNS: &str =
    "id, quiz_id, student_id, status, score, max_score, percentage, submitted_at";

/// Column list for `question_responses` queries.
const RESPONSE_COLUMNS: &str = "id, attempt_id, question_id, selected_option_ids, \
                                 is_correct, marks_obtained, answered_at";

/// Provides attempt history reads and the graded-submission write.
pub struct AttemptRepo;

impl AttemptRepo {
    /// Persist a graded submission: the attempt row, one response row per
    /// question, and — when the attempt passed a step quiz — the lesson
    /// completion upsert, all in one transaction. A failure anywhere rolls
    /// the whole submission back.
    pub async fn create_graded(
        pool: &PgPool,
        quiz_id: DbId,
        student_id: DbId,
        grade: &QuizGrade,
        complete_lesson_id: Option<DbId>,
    ) -> Result<QuizAttempt, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO quiz_attempts (quiz_id, student_id, status, score, max_score,
                                        percentage, submitted_at)
             VALUES ($1, $2, $3, $4, $5, $6, now())
             RETURNING {ATTEMPT_COLUMNS}"
        );
        let attempt = sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(quiz_id)
            .bind(student_id)
            .bind(ATTEMPT_STATUS_SUBMITTED)
            .bind(grade.score)
            .bind(grade.max_score)
            .bind(grade.percentage)
            .fetch_one(&mut *tx)
            .await?;

        for graded in &grade.questions {
            sqlx::query(
                "INSERT INTO question_responses
                    (attempt_id, question_id, selected_option_ids, is_correct, marks_obtained)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(attempt.id)
            .bind(graded.question_id)
            .bind(&graded.selected_option_ids)
            .bind(graded.is_correct)
            .bind(graded.marks_obtained)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(lesson_id) = complete_lesson_id {
            sqlx::query(
                "INSERT INTO lesson_progress (lesson_id, student_id, completed, completed_at)
                 VALUES ($1, $2, TRUE, now())
                 ON CONFLICT (lesson_id, student_id) DO UPDATE
                 SET completed = TRUE, completed_at = now()",
            )
            .bind(lesson_id)
            .bind(student_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(attempt)
    }

    /// A student's attempts on a quiz, newest first.
    pub async fn list_for_student(
        pool: &PgPool,
        quiz_id: DbId,
        student_id: DbId,
    ) -> Result<Vec<QuizAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts
             WHERE quiz_id = $1 AND student_id = $2
             ORDER BY submitted_at DESC"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(quiz_id)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// The student's most recent submitted attempt per quiz, batched for
    /// the step-list builder.
    pub async fn latest_submitted_per_quiz(
        pool: &PgPool,
        student_id: DbId,
        quiz_ids: &[DbId],
    ) -> Result<Vec<LatestAttempt>, sqlx::Error> {
        sqlx::query_as::<_, LatestAttempt>(
            "SELECT DISTINCT ON (quiz_id) quiz_id, percentage, submitted_at
             FROM quiz_attempts
             WHERE student_id = $1 AND quiz_id = ANY($2) AND status = $3
             ORDER BY quiz_id, submitted_at DESC",
        )
        .bind(student_id)
        .bind(quiz_ids)
        .bind(ATTEMPT_STATUS_SUBMITTED)
        .fetch_all(pool)
        .await
    }

    /// Response rows for one attempt.
    pub async fn list_responses(
        pool: &PgPool,
        attempt_id: DbId,
    ) -> Result<Vec<QuestionResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM question_responses
             WHERE attempt_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, QuestionResponse>(&query)
            .bind(attempt_id)
            .fetch_all(pool)
            .await
    }
}
