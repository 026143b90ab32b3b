//! Quiz entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// A quiz row from the `quizzes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quiz {
    pub id: DbId,
    pub module_id: Option<DbId>,
    pub course_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
    /// Unpublished quizzes are invisible to learners.
    pub is_published: bool,
    /// Percentage threshold an attempt must meet or exceed to pass.
    pub passing_score: i32,
    /// Stored but not enforced by the progression workflow.
    pub max_attempts: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a quiz.
#[derive(Debug)]
pub struct CreateQuiz {
    pub module_id: Option<DbId>,
    pub course_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub created_by: Option<DbId>,
    pub is_published: bool,
    pub passing_score: i32,
}

/// DTO for updating quiz metadata. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateQuiz {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_published: Option<bool>,
    pub passing_score: Option<i32>,
    pub max_attempts: Option<i32>,
}
