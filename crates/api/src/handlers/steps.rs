//! Handlers for step authoring: the module + lesson + quiz bundle a
//! course editor saves as one unit.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use stepwise_core::error::CoreError;
use stepwise_core::grading::QuestionKind;
use stepwise_core::types::DbId;
use stepwise_db::models::lesson::{Lesson, UpsertLesson};
use stepwise_db::models::module::{CreateModule, Module, UpdateModule};
use stepwise_db::models::question::{QuestionInput, QuestionWithOptions};
use stepwise_db::models::quiz::{CreateQuiz, Quiz, UpdateQuiz};
use stepwise_db::repositories::{LessonRepo, ModuleRepo, QuizRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::courses::ensure_course_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireFaculty;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// The quiz portion of a step save.
#[derive(Debug, Deserialize)]
pub struct StepQuizInput {
    #[serde(default)]
    pub title: Option<String>,
    pub questions: Vec<QuestionInput>,
}

/// Request body for `POST`/`PUT` step saves.
#[derive(Debug, Deserialize)]
pub struct SaveStepRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    /// Omitted or empty questions = the step has no quiz.
    #[serde(default)]
    pub quiz: Option<StepQuizInput>,
}

/// The saved step bundle echoed back to the editor.
#[derive(Debug, Serialize)]
pub struct StepBundle {
    pub module: Module,
    /// `None` only for legacy modules saved without content.
    pub lesson: Option<Lesson>,
    pub quiz: Option<Quiz>,
    pub questions: Vec<QuestionWithOptions>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject edits by anyone but the owning instructor or an admin.
async fn ensure_can_edit_course(
    pool: &sqlx::PgPool,
    user: &AuthUser,
    course_id: DbId,
) -> AppResult<()> {
    let course = ensure_course_exists(pool, course_id).await?;
    if user.is_admin() || course.instructor_id == Some(user.user_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the course instructor may edit its steps".into(),
        )))
    }
}

/// Questions with blank text are skipped; the rest must parse.
fn validate_questions(inputs: &[QuestionInput]) -> AppResult<Vec<QuestionInput>> {
    let mut kept = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.text.trim().is_empty() {
            continue;
        }
        QuestionKind::from_str_value(&input.qtype)
            .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

        let options: Vec<_> = input
            .options
            .iter()
            .filter(|o| !o.text.trim().is_empty())
            .cloned()
            .collect();
        if options.is_empty() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Question '{}' has no options",
                input.text
            ))));
        }

        kept.push(QuestionInput {
            text: input.text.clone(),
            qtype: input.qtype.clone(),
            explanation: input.explanation.clone(),
            options,
        });
    }
    Ok(kept)
}

/// Upsert the lesson and quiz halves of a step bundle.
///
/// Quiz questions are replaced wholesale: the posted set becomes the
/// quiz's entire question list and prior ids are gone.
async fn save_step_content(
    state: &AppState,
    user: &AuthUser,
    course_id: DbId,
    module: Module,
    input: &SaveStepRequest,
) -> AppResult<StepBundle> {
    let lesson = LessonRepo::upsert_for_module(
        &state.pool,
        module.id,
        &UpsertLesson {
            title: input.title.clone(),
            content: input.content.clone(),
            media_url: input.video_url.clone(),
            duration_seconds: None,
        },
    )
    .await?;

    let questions = match &input.quiz {
        Some(quiz_input) => validate_questions(&quiz_input.questions)?,
        None => Vec::new(),
    };

    if questions.is_empty() {
        return Ok(StepBundle {
            module,
            lesson: Some(lesson),
            quiz: None,
            questions: Vec::new(),
        });
    }

    let quiz_title = input
        .quiz
        .as_ref()
        .and_then(|q| q.title.clone())
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("Quiz for {}", input.title));

    let quiz = match QuizRepo::find_by_module(&state.pool, module.id).await? {
        Some(existing) => QuizRepo::update(
            &state.pool,
            existing.id,
            &UpdateQuiz {
                title: Some(quiz_title),
                description: None,
                is_published: Some(true),
                passing_score: None,
                max_attempts: None,
            },
        )
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Quiz",
                id: existing.id,
            })
        })?,
        None => {
            QuizRepo::create(
                &state.pool,
                &CreateQuiz {
                    module_id: Some(module.id),
                    course_id: Some(course_id),
                    title: quiz_title,
                    description: None,
                    created_by: Some(user.user_id),
                    is_published: true,
                    // DB default; stated explicitly because CreateQuiz binds it.
                    passing_score: 70,
                },
            )
            .await?
        }
    };

    let saved_questions = QuizRepo::replace_questions(&state.pool, quiz.id, &questions).await?;

    Ok(StepBundle {
        module,
        lesson: Some(lesson),
        quiz: Some(quiz),
        questions: saved_questions,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/courses/{id}/steps
///
/// Create a step: module appended at the end of the course, its lesson,
/// and optionally its quiz.
pub async fn create_step(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    Json(input): Json<SaveStepRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<StepBundle>>)> {
    ensure_can_edit_course(&state.pool, &user, course_id).await?;
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Step title is required".into(),
        )));
    }

    let position = match input.position {
        Some(p) => p,
        None => ModuleRepo::count_by_course(&state.pool, course_id).await? as i32,
    };

    let module = ModuleRepo::create(
        &state.pool,
        &CreateModule {
            course_id,
            title: input.title.clone(),
            description: input.description.clone(),
            position,
        },
    )
    .await?;

    let bundle = save_step_content(&state, &user, course_id, module, &input).await?;

    tracing::info!(
        course_id,
        module_id = bundle.module.id,
        has_quiz = bundle.quiz.is_some(),
        "Step created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: bundle })))
}

/// PUT /api/v1/courses/{id}/steps/{module_id}
///
/// Update a step bundle in place. The quiz's question set is replaced
/// with the posted one.
pub async fn update_step(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
    Path((course_id, module_id)): Path<(DbId, DbId)>,
    Json(input): Json<SaveStepRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_can_edit_course(&state.pool, &user, course_id).await?;
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Step title is required".into(),
        )));
    }

    let module = ModuleRepo::update(
        &state.pool,
        module_id,
        &UpdateModule {
            title: Some(input.title.clone()),
            description: input.description.clone(),
            position: input.position,
        },
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Module",
            id: module_id,
        })
    })?;

    if module.course_id != course_id {
        return Err(AppError::Core(CoreError::Validation(
            "Module does not belong to this course".into(),
        )));
    }

    let bundle = save_step_content(&state, &user, course_id, module, &input).await?;

    Ok(Json(DataResponse { data: bundle }))
}

/// GET /api/v1/courses/{id}/steps/{module_id}
///
/// Load a step bundle for the editor, answer key included.
pub async fn get_step(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
    Path((course_id, module_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_can_edit_course(&state.pool, &user, course_id).await?;

    let module = ModuleRepo::find_by_id(&state.pool, module_id)
        .await?
        .filter(|m| m.course_id == course_id)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Module",
                id: module_id,
            })
        })?;

    let lesson = LessonRepo::find_by_module(&state.pool, module.id).await?;
    let quiz = QuizRepo::find_by_module(&state.pool, module.id).await?;
    let questions = match &quiz {
        Some(quiz) => QuizRepo::questions_with_options(&state.pool, quiz.id).await?,
        None => Vec::new(),
    };

    Ok(Json(DataResponse {
        data: StepBundle {
            module,
            lesson,
            quiz,
            questions,
        },
    }))
}

/// DELETE /api/v1/courses/{id}/steps/{module_id}
///
/// Delete a step. Its lesson and quiz cascade.
pub async fn delete_step(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
    Path((course_id, module_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_can_edit_course(&state.pool, &user, course_id).await?;

    let module = ModuleRepo::find_by_id(&state.pool, module_id)
        .await?
        .filter(|m| m.course_id == course_id)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Module",
                id: module_id,
            })
        })?;

    ModuleRepo::delete(&state.pool, module.id).await?;
    tracing::info!(course_id, module_id, "Step deleted");

    Ok(StatusCode::NO_CONTENT)
}
