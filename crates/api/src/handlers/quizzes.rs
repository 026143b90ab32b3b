//! Handlers for quiz authoring: the faculty-facing list and metadata
//! editing. Learner-facing submission lives in [`super::learning`].

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use stepwise_core::error::CoreError;
use stepwise_core::types::DbId;
use stepwise_db::models::question::QuestionWithOptions;
use stepwise_db::models::quiz::{Quiz, UpdateQuiz};
use stepwise_db::repositories::QuizRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireFaculty;
use crate::response::DataResponse;
use crate::state::AppState;

/// A quiz with its full question set, answer key included (author view).
#[derive(Debug, Serialize)]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<QuestionWithOptions>,
}

/// Reject edits by anyone but the quiz creator or an admin.
fn ensure_can_edit(user: &AuthUser, quiz: &Quiz) -> AppResult<()> {
    if user.is_admin() || quiz.created_by == Some(user.user_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the quiz creator may edit this quiz".into(),
        )))
    }
}

/// GET /api/v1/quizzes
///
/// Faculty see their own quizzes; admins see their own too (quiz scope is
/// per creator, matching the authoring pages).
pub async fn list_quizzes(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let quizzes = QuizRepo::list_by_creator(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: quizzes }))
}

/// GET /api/v1/quizzes/{id}
///
/// Author view: quiz metadata plus questions with the answer key.
pub async fn get_quiz(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let quiz = QuizRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Quiz", id }))?;
    ensure_can_edit(&user, &quiz)?;

    let questions = QuizRepo::questions_with_options(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: QuizDetail { quiz, questions },
    }))
}

/// PUT /api/v1/quizzes/{id}
///
/// Update quiz metadata: title, description, passing score, publish flag,
/// attempt cap.
pub async fn update_quiz(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuiz>,
) -> AppResult<impl IntoResponse> {
    let quiz = QuizRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Quiz", id }))?;
    ensure_can_edit(&user, &quiz)?;

    if let Some(score) = input.passing_score {
        if !(0..=100).contains(&score) {
            return Err(AppError::Core(CoreError::Validation(
                "passing_score must be between 0 and 100".into(),
            )));
        }
    }

    let updated = QuizRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Quiz", id }))?;

    tracing::info!(quiz_id = id, user_id = user.user_id, "Quiz metadata updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/quizzes/{id}
///
/// Delete a quiz. Its questions and attempt history cascade.
pub async fn delete_quiz(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<axum::http::StatusCode> {
    let quiz = QuizRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Quiz", id }))?;
    ensure_can_edit(&user, &quiz)?;

    QuizRepo::delete(&state.pool, id).await?;
    tracing::info!(quiz_id = id, user_id = user.user_id, "Quiz deleted");

    Ok(axum::http::StatusCode::NO_CONTENT)
}
