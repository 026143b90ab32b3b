//! Handlers for the course-consumption flow: the gated step list, manual
//! lesson completion, and quiz submission with server-side grading.
//!
//! Lock state is never stored. Every read derives it from live rows via
//! `stepwise_core::progression`, so the response after any write reflects
//! exactly what the database holds.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use stepwise_core::error::CoreError;
use stepwise_core::grading::{self, AnswerInput, KeyQuestion};
use stepwise_core::progression::{
    self, AttemptSnapshot, LessonState, QuizState, StepSource,
};
use stepwise_core::types::DbId;
use stepwise_db::models::attempt::QuizAttempt;
use stepwise_db::models::question::QuestionWithOptions;
use stepwise_db::models::quiz::Quiz;
use stepwise_db::repositories::{
    AttemptRepo, EnrollmentRepo, LessonRepo, ModuleRepo, ProgressRepo, QuizRepo,
};

use crate::error::{AppError, AppResult};
use crate::handlers::courses::ensure_course_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// One option as shown to a learner. The answer key is withheld from
/// students until they hold a submitted attempt's result.
#[derive(Debug, Serialize)]
pub struct OptionView {
    pub id: DbId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// One question as shown to a learner.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: DbId,
    pub text: String,
    pub qtype: String,
    pub options: Vec<OptionView>,
}

/// A step's quiz as shown to a learner.
#[derive(Debug, Serialize)]
pub struct QuizView {
    pub id: DbId,
    pub title: String,
    pub passing_score: i32,
    pub questions: Vec<QuestionView>,
}

/// One gated step of the course.
#[derive(Debug, Serialize)]
pub struct StepView {
    pub module_id: DbId,
    /// 1-based display number.
    pub step_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub lesson_id: Option<DbId>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub quiz: Option<QuizView>,
    pub is_completed: bool,
    pub is_locked: bool,
}

/// Response body for `GET /courses/{id}/steps`.
#[derive(Debug, Serialize)]
pub struct StepsResponse {
    pub course_id: DbId,
    pub course_title: String,
    pub steps: Vec<StepView>,
    /// Index of the first unlocked step; the UI's initial active step.
    pub current_step: Option<usize>,
}

/// Request body for `POST /quizzes/{id}/attempts`.
#[derive(Debug, Deserialize)]
pub struct SubmitAttemptRequest {
    pub answers: Vec<AnswerInput>,
}

/// Per-question outcome in a submission response, answer key included.
#[derive(Debug, Serialize)]
pub struct QuestionResult {
    pub question_id: DbId,
    pub selected_option_ids: Vec<DbId>,
    pub correct_option_ids: Vec<DbId>,
    pub is_correct: bool,
}

/// Response body for a graded submission.
#[derive(Debug, Serialize)]
pub struct SubmissionResult {
    pub attempt: QuizAttempt,
    pub passed: bool,
    /// The threshold the attempt was judged against.
    pub passing_score: i32,
    pub results: Vec<QuestionResult>,
    /// Set when passing completed the step's lesson.
    pub completed_lesson_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load a quiz or return NotFound.
async fn ensure_quiz_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Quiz> {
    QuizRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Quiz", id }))
}

/// Students must hold an enrollment row before touching gated content;
/// faculty and admins bypass the check.
async fn ensure_enrolled(
    pool: &sqlx::PgPool,
    user: &AuthUser,
    course_id: DbId,
) -> AppResult<()> {
    if !user.is_student() {
        return Ok(());
    }
    let enrolled = EnrollmentRepo::find(pool, course_id, user.user_id)
        .await?
        .is_some();
    if enrolled {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You must enroll in this course first".into(),
        )))
    }
}

/// Build the grading key from stored questions.
fn answer_key(questions: &[QuestionWithOptions]) -> Vec<KeyQuestion> {
    questions
        .iter()
        .map(|q| KeyQuestion {
            question_id: q.question.id,
            correct_option_ids: q
                .options
                .iter()
                .filter(|o| o.is_correct)
                .map(|o| o.id)
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Step list
// ---------------------------------------------------------------------------

/// GET /api/v1/courses/{id}/steps
///
/// The step-list builder: batched reads, then pure lock derivation.
/// Read-only and idempotent -- the client re-invokes it after every write.
pub async fn list_steps(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let course = ensure_course_exists(&state.pool, course_id).await?;
    ensure_enrolled(&state.pool, &user, course_id).await?;

    let modules = ModuleRepo::list_by_course(&state.pool, course_id).await?;
    if modules.is_empty() {
        return Ok(Json(DataResponse {
            data: StepsResponse {
                course_id,
                course_title: course.title,
                steps: Vec::new(),
                current_step: None,
            },
        }));
    }
    let module_ids: Vec<DbId> = modules.iter().map(|m| m.id).collect();

    // Batched reads: lessons, progress keyed by lesson id, published
    // quizzes, and the latest submitted attempt per quiz.
    let lessons = LessonRepo::list_by_modules(&state.pool, &module_ids).await?;
    let lesson_by_module: HashMap<DbId, _> =
        lessons.into_iter().map(|l| (l.module_id, l)).collect();

    let lesson_ids: Vec<DbId> = lesson_by_module.values().map(|l| l.id).collect();
    let progress = ProgressRepo::list_for_student(&state.pool, user.user_id, &lesson_ids).await?;
    let completed: HashMap<DbId, bool> = progress
        .into_iter()
        .map(|p| (p.lesson_id, p.completed))
        .collect();

    let quizzes = QuizRepo::list_published_by_modules(&state.pool, &module_ids).await?;
    let quiz_ids: Vec<DbId> = quizzes.iter().map(|q| q.id).collect();
    let latest = AttemptRepo::latest_submitted_per_quiz(&state.pool, user.user_id, &quiz_ids)
        .await?;
    let latest_by_quiz: HashMap<DbId, AttemptSnapshot> = latest
        .into_iter()
        .map(|a| {
            (
                a.quiz_id,
                AttemptSnapshot {
                    submitted_at: a.submitted_at,
                    percentage: a.percentage,
                },
            )
        })
        .collect();

    let mut quiz_by_module: HashMap<DbId, (Quiz, Vec<QuestionWithOptions>)> = HashMap::new();
    for quiz in quizzes {
        let questions = QuizRepo::questions_with_options(&state.pool, quiz.id).await?;
        // A quiz with zero questions gates nothing; render the step as
        // quiz-less instead of erroring.
        if questions.is_empty() {
            continue;
        }
        if let Some(module_id) = quiz.module_id {
            quiz_by_module.insert(module_id, (quiz, questions));
        }
    }

    // Pure derivation over the pre-loaded rows.
    let sources: Vec<StepSource> = modules
        .iter()
        .map(|module| StepSource {
            module_id: module.id,
            lesson: lesson_by_module.get(&module.id).map(|l| LessonState {
                lesson_id: l.id,
                completed: completed.get(&l.id).copied().unwrap_or(false),
            }),
            quiz: quiz_by_module.get(&module.id).map(|(quiz, _)| QuizState {
                quiz_id: quiz.id,
                passed: progression::quiz_passed(
                    latest_by_quiz
                        .get(&quiz.id)
                        .map(std::slice::from_ref)
                        .unwrap_or(&[]),
                    quiz.passing_score,
                ),
            }),
        })
        .collect();

    let statuses = progression::derive_steps(&sources);
    let current_step = progression::first_unlocked(&statuses);

    // Students never receive the answer key alongside the questions.
    let reveal_key = !user.is_student();

    let steps: Vec<StepView> = modules
        .into_iter()
        .zip(statuses)
        .map(|(module, status)| {
            let lesson = lesson_by_module.get(&module.id);
            let quiz = quiz_by_module.get(&module.id).map(|(quiz, questions)| QuizView {
                id: quiz.id,
                title: quiz.title.clone(),
                passing_score: quiz.passing_score,
                questions: questions
                    .iter()
                    .map(|q| QuestionView {
                        id: q.question.id,
                        text: q.question.text.clone(),
                        qtype: q.question.qtype.clone(),
                        options: q
                            .options
                            .iter()
                            .map(|o| OptionView {
                                id: o.id,
                                text: o.text.clone(),
                                is_correct: reveal_key.then_some(o.is_correct),
                            })
                            .collect(),
                    })
                    .collect(),
            });

            StepView {
                module_id: module.id,
                step_number: status.step_number,
                title: module.title,
                description: module.description,
                lesson_id: lesson.map(|l| l.id),
                content: lesson.and_then(|l| l.content.clone()),
                video_url: lesson.and_then(|l| l.media_url.clone()),
                quiz,
                is_completed: status.is_completed,
                is_locked: status.is_locked,
            }
        })
        .collect();

    Ok(Json(DataResponse {
        data: StepsResponse {
            course_id,
            course_title: course.title,
            steps,
            current_step,
        },
    }))
}

// ---------------------------------------------------------------------------
// Lesson completion
// ---------------------------------------------------------------------------

/// POST /api/v1/lessons/{id}/complete
///
/// Mark a quiz-less step's lesson complete. Steps with a published quiz
/// complete only by passing that quiz (409).
pub async fn complete_lesson(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lesson = LessonRepo::find_by_id(&state.pool, lesson_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Lesson",
                id: lesson_id,
            })
        })?;

    let module = ModuleRepo::find_by_id(&state.pool, lesson.module_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Module",
                id: lesson.module_id,
            })
        })?;
    ensure_enrolled(&state.pool, &user, module.course_id).await?;

    if let Some(quiz) = QuizRepo::find_by_module(&state.pool, module.id).await? {
        if quiz.is_published {
            return Err(AppError::Core(CoreError::Conflict(
                "This step is completed by passing its quiz".into(),
            )));
        }
    }

    let progress = ProgressRepo::mark_completed(&state.pool, lesson_id, user.user_id).await?;

    tracing::info!(
        lesson_id,
        student_id = user.user_id,
        "Lesson marked complete",
    );

    Ok(Json(DataResponse { data: progress }))
}

// ---------------------------------------------------------------------------
// Quiz submission
// ---------------------------------------------------------------------------

/// POST /api/v1/quizzes/{id}/attempts
///
/// Grade the posted answer set server-side and persist the outcome in one
/// transaction: attempt row, per-question responses, and -- when the
/// attempt passes a step quiz -- the lesson completion. Retries simply
/// POST again; prior attempts are never touched.
pub async fn submit_attempt(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
    Json(input): Json<SubmitAttemptRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmissionResult>>)> {
    let quiz = ensure_quiz_exists(&state.pool, quiz_id).await?;
    if !quiz.is_published {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Quiz",
            id: quiz_id,
        }));
    }

    // Resolve the course for the enrollment check and the step lesson for
    // completion-on-pass.
    let module = match quiz.module_id {
        Some(module_id) => ModuleRepo::find_by_id(&state.pool, module_id).await?,
        None => None,
    };
    let course_id = module.as_ref().map(|m| m.course_id).or(quiz.course_id);
    if let Some(course_id) = course_id {
        ensure_enrolled(&state.pool, &user, course_id).await?;
    }

    let questions = QuizRepo::questions_with_options(&state.pool, quiz.id).await?;
    if questions.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Quiz has no questions".into(),
        )));
    }

    let key = answer_key(&questions);
    let grade = grading::grade(&key, &input.answers);
    let passed = grading::is_passing(grade.percentage, quiz.passing_score);

    let step_lesson = match (&module, passed) {
        (Some(module), true) => LessonRepo::find_by_module(&state.pool, module.id).await?,
        _ => None,
    };
    let completed_lesson_id = step_lesson.map(|l| l.id);

    let attempt = AttemptRepo::create_graded(
        &state.pool,
        quiz.id,
        user.user_id,
        &grade,
        completed_lesson_id,
    )
    .await?;

    tracing::info!(
        quiz_id,
        student_id = user.user_id,
        score = grade.score,
        max_score = grade.max_score,
        passed,
        "Quiz attempt submitted",
    );

    let correct_by_question: HashMap<DbId, Vec<DbId>> = key
        .into_iter()
        .map(|k| (k.question_id, k.correct_option_ids))
        .collect();

    let results = grade
        .questions
        .iter()
        .map(|g| QuestionResult {
            question_id: g.question_id,
            selected_option_ids: g.selected_option_ids.clone(),
            correct_option_ids: correct_by_question
                .get(&g.question_id)
                .cloned()
                .unwrap_or_default(),
            is_correct: g.is_correct,
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmissionResult {
                attempt,
                passed,
                passing_score: quiz.passing_score,
                results,
                completed_lesson_id,
            },
        }),
    ))
}

/// GET /api/v1/quizzes/{id}/attempts
///
/// The caller's own attempt history on a quiz, newest first.
pub async fn list_attempts(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_quiz_exists(&state.pool, quiz_id).await?;

    let attempts = AttemptRepo::list_for_student(&state.pool, quiz_id, user.user_id).await?;

    Ok(Json(DataResponse { data: attempts }))
}
