//! Handlers for the role dashboards and the admin analytics page.
//!
//! Everything here is read-only aggregation; no derived state feeds back
//! into the system.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use stepwise_db::models::stats::{
    AdminCounts, FacultyStats, MonthlyCount, QuizOutcomes, TopCourse, VisibilityCount,
};
use stepwise_db::repositories::AnalyticsRepo;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireFaculty};
use crate::response::DataResponse;
use crate::state::AppState;

/// How many courses the top-courses widget ranks.
const TOP_COURSES_LIMIT: i64 = 5;

/// Composite payload for the admin analytics page.
#[derive(Debug, Serialize)]
pub struct AdminAnalytics {
    pub counts: AdminCounts,
    pub user_growth: Vec<MonthlyCount>,
    pub enrollment_trend: Vec<MonthlyCount>,
    pub top_courses: Vec<TopCourse>,
    pub quiz_outcomes: QuizOutcomes,
    pub visibility_distribution: Vec<VisibilityCount>,
}

/// GET /api/v1/dashboard/admin
///
/// Headline counts for the admin dashboard.
pub async fn admin_dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AdminCounts>>> {
    let counts = AnalyticsRepo::admin_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// GET /api/v1/dashboard/faculty
///
/// Headline counts over the caller's own courses and quizzes.
pub async fn faculty_dashboard(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<FacultyStats>>> {
    let stats = AnalyticsRepo::faculty_stats(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/dashboard/student
///
/// The caller's enrollments with per-course lesson-completion counts.
pub async fn student_dashboard(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let enrollments =
        AnalyticsRepo::student_enrollment_progress(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: enrollments }))
}

/// GET /api/v1/admin/analytics
///
/// The full analytics payload: growth and trend series, top courses,
/// quiz outcomes, and visibility distribution.
pub async fn admin_analytics(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AdminAnalytics>>> {
    let counts = AnalyticsRepo::admin_counts(&state.pool).await?;
    let user_growth = AnalyticsRepo::user_growth_by_month(&state.pool).await?;
    let enrollment_trend = AnalyticsRepo::enrollment_trend_by_month(&state.pool).await?;
    let top_courses = AnalyticsRepo::top_courses(&state.pool, TOP_COURSES_LIMIT).await?;
    let quiz_outcomes = AnalyticsRepo::quiz_outcomes(&state.pool).await?;
    let visibility_distribution = AnalyticsRepo::visibility_distribution(&state.pool).await?;

    Ok(Json(DataResponse {
        data: AdminAnalytics {
            counts,
            user_growth,
            enrollment_trend,
            top_courses,
            quiz_outcomes,
            visibility_distribution,
        },
    }))
}
