//! Row shapes for the dashboard and analytics aggregate queries.

use serde::Serialize;
use sqlx::FromRow;
use stepwise_core::types::DbId;

/// Headline counts for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminCounts {
    pub total_users: i64,
    pub total_courses: i64,
    pub total_students: i64,
    pub total_faculty: i64,
    pub total_quizzes: i64,
}

/// Headline counts for a faculty member's dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FacultyStats {
    pub course_count: i64,
    pub enrollment_count: i64,
    pub quiz_count: i64,
    pub attempt_count: i64,
}

/// One month's bucket in a growth/trend series (`YYYY-MM`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyCount {
    pub month: String,
    pub count: i64,
}

/// A course ranked by enrollment.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopCourse {
    pub course_id: DbId,
    pub title: String,
    pub enrollments: i64,
}

/// Aggregate quiz outcome numbers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizOutcomes {
    pub total_attempts: i64,
    pub passed_attempts: i64,
}

/// Course count per visibility value.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VisibilityCount {
    pub visibility: String,
    pub count: i64,
}
