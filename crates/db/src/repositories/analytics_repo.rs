//! Read-only aggregate queries behind the dashboards and the admin
//! analytics page.
//!
//! Everything here is a plain GROUP BY/COUNT over live tables; no derived
//! state is written back.

use sqlx::PgPool;
use stepwise_core::types::DbId;

use crate::models::enrollment::EnrollmentProgress;
use crate::models::stats::{
    AdminCounts, FacultyStats, MonthlyCount, QuizOutcomes, TopCourse, VisibilityCount,
};

/// Provides dashboard and analytics aggregates.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Headline counts for the admin dashboard.
    pub async fn admin_counts(pool: &PgPool) -> Result<AdminCounts, sqlx::Error> {
        sqlx::query_as::<_, AdminCounts>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM courses) AS total_courses,
                (SELECT COUNT(*) FROM users u JOIN roles r ON r.id = u.role_id
                  WHERE r.name = 'student') AS total_students,
                (SELECT COUNT(*) FROM users u JOIN roles r ON r.id = u.role_id
                  WHERE r.name = 'faculty') AS total_faculty,
                (SELECT COUNT(*) FROM quizzes) AS total_quizzes",
        )
        .fetch_one(pool)
        .await
    }

    /// Headline counts for one faculty member: their courses, the
    /// enrollments and attempts those courses carry, and their quizzes.
    pub async fn faculty_stats(
        pool: &PgPool,
        instructor_id: DbId,
    ) -> Result<FacultyStats, sqlx::Error> {
        sqlx::query_as::<_, FacultyStats>(
            "SELECT
                (SELECT COUNT(*) FROM courses WHERE instructor_id = $1) AS course_count,
                (SELECT COUNT(*) FROM enrollments e
                  JOIN courses c ON c.id = e.course_id
                  WHERE c.instructor_id = $1) AS enrollment_count,
                (SELECT COUNT(*) FROM quizzes WHERE created_by = $1) AS quiz_count,
                (SELECT COUNT(*) FROM quiz_attempts a
                  JOIN quizzes q ON q.id = a.quiz_id
                  WHERE q.created_by = $1) AS attempt_count",
        )
        .bind(instructor_id)
        .fetch_one(pool)
        .await
    }

    /// New users per month, oldest bucket first.
    pub async fn user_growth_by_month(pool: &PgPool) -> Result<Vec<MonthlyCount>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyCount>(
            "SELECT to_char(created_at, 'YYYY-MM') AS month, COUNT(*) AS count
             FROM users
             GROUP BY 1 ORDER BY 1",
        )
        .fetch_all(pool)
        .await
    }

    /// New enrollments per month, oldest bucket first.
    pub async fn enrollment_trend_by_month(
        pool: &PgPool,
    ) -> Result<Vec<MonthlyCount>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyCount>(
            "SELECT to_char(enrolled_at, 'YYYY-MM') AS month, COUNT(*) AS count
             FROM enrollments
             GROUP BY 1 ORDER BY 1",
        )
        .fetch_all(pool)
        .await
    }

    /// The most-enrolled courses.
    pub async fn top_courses(pool: &PgPool, limit: i64) -> Result<Vec<TopCourse>, sqlx::Error> {
        sqlx::query_as::<_, TopCourse>(
            "SELECT c.id AS course_id, c.title, COUNT(e.id) AS enrollments
             FROM courses c
             LEFT JOIN enrollments e ON e.course_id = c.id
             GROUP BY c.id, c.title
             ORDER BY enrollments DESC, c.id
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Total and passed attempt counts, judged against each quiz's own
    /// passing score.
    pub async fn quiz_outcomes(pool: &PgPool) -> Result<QuizOutcomes, sqlx::Error> {
        sqlx::query_as::<_, QuizOutcomes>(
            "SELECT COUNT(*) AS total_attempts,
                    COUNT(*) FILTER (WHERE a.percentage >= q.passing_score)
                        AS passed_attempts
             FROM quiz_attempts a
             JOIN quizzes q ON q.id = a.quiz_id",
        )
        .fetch_one(pool)
        .await
    }

    /// Course count per visibility value.
    pub async fn visibility_distribution(
        pool: &PgPool,
    ) -> Result<Vec<VisibilityCount>, sqlx::Error> {
        sqlx::query_as::<_, VisibilityCount>(
            "SELECT visibility, COUNT(*) AS count
             FROM courses
             GROUP BY visibility ORDER BY visibility",
        )
        .fetch_all(pool)
        .await
    }

    /// A student's enrollments with per-course lesson-completion counts,
    /// newest enrollment first.
    pub async fn student_enrollment_progress(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<EnrollmentProgress>, sqlx::Error> {
        sqlx::query_as::<_, EnrollmentProgress>(
            "SELECT c.id AS course_id, c.title AS course_title, c.slug AS course_slug,
                    c.thumbnail_url, e.enrolled_at,
                    COUNT(l.id) AS total_lessons,
                    COUNT(lp.id) FILTER (WHERE lp.completed) AS completed_lessons
             FROM enrollments e
             JOIN courses c ON c.id = e.course_id
             LEFT JOIN modules m ON m.course_id = c.id
             LEFT JOIN lessons l ON l.module_id = m.id
             LEFT JOIN lesson_progress lp
                    ON lp.lesson_id = l.id AND lp.student_id = e.student_id
             WHERE e.student_id = $1
             GROUP BY c.id, c.title, c.slug, c.thumbnail_url, e.enrolled_at
             ORDER BY e.enrolled_at DESC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await
    }
}
