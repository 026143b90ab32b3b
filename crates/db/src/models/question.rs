//! Question and option entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// A question row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub quiz_id: DbId,
    pub text: String,
    /// `single` or `multiple`.
    pub qtype: String,
    pub marks: i32,
    pub explanation: Option<String>,
    pub position: i32,
    pub created_at: Timestamp,
}

/// An option row from the `options` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnswerOption {
    pub id: DbId,
    pub question_id: DbId,
    pub text: String,
    pub is_correct: bool,
    pub position: i32,
}

/// DTO for one option within a question save.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionInput {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// DTO for one question within a quiz save.
///
/// Saves are full-replace: the posted set becomes the quiz's entire
/// question list and prior question/option ids are not preserved.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionInput {
    pub text: String,
    pub qtype: String,
    #[serde(default)]
    pub explanation: Option<String>,
    pub options: Vec<OptionInput>,
}

/// A question with its options, as loaded for grading or display.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithOptions {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<AnswerOption>,
}
