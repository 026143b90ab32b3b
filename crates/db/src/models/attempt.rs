//! Quiz-attempt and question-response entity models.

use serde::Serialize;
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// Attempt status for graded submissions. Every attempt this workflow
/// writes is already submitted; no draft state is persisted.
pub const ATTEMPT_STATUS_SUBMITTED: &str = "submitted";

/// A quiz-attempt row. One row per submission; retries append rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizAttempt {
    pub id: DbId,
    pub quiz_id: DbId,
    pub student_id: DbId,
    pub status: String,
    pub score: i32,
    pub max_score: i32,
    pub percentage: f64,
    pub submitted_at: Timestamp,
}

/// A question-response row: one per question per attempt, carrying the
/// selected option set and a single correctness verdict.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionResponse {
    pub id: DbId,
    pub attempt_id: DbId,
    /// NULL when the question was deleted by a later quiz re-save.
    pub question_id: Option<DbId>,
    pub selected_option_ids: Vec<DbId>,
    pub is_correct: bool,
    pub marks_obtained: i32,
    pub answered_at: Timestamp,
}

/// The latest submitted attempt for a quiz, as selected per student when
/// deriving lock state.
#[derive(Debug, Clone, FromRow)]
pub struct LatestAttempt {
    pub quiz_id: DbId,
    pub percentage: f64,
    pub submitted_at: Timestamp,
}
