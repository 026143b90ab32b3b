//! Handlers for the `/courses` resource: catalog listing, detail,
//! authoring CRUD, targeting, and enrollment.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use stepwise_core::error::CoreError;
use stepwise_core::naming::slugify;
use stepwise_core::targeting::{self, TargetCriteria};
use stepwise_core::types::DbId;
use stepwise_core::visibility::Visibility;
use stepwise_db::models::course::{
    Course, CourseSearchParams, CreateCourse, UpdateCourse,
};
use stepwise_db::models::enrollment::Enrollment;
use stepwise_db::repositories::{
    CourseRepo, EnrollmentRepo, ProfileRepo, UserRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireFaculty};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// Request body for course create/update.
#[derive(Debug, Deserialize)]
pub struct SaveCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// `public`, `private`, or `targeted`.
    pub visibility: String,
    /// Required when visibility is `targeted`.
    #[serde(default)]
    pub targeting: Option<TargetCriteria>,
}

/// Course detail plus the viewer's relationship to it.
#[derive(Debug, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub enrollment_count: i64,
    pub is_enrolled: bool,
}

/// Audience size reported back after a targeted-course save.
#[derive(Debug, Serialize)]
pub struct SaveCourseResponse {
    #[serde(flatten)]
    pub course: Course,
    /// `None` unless the course is targeted.
    pub targeted_students: Option<usize>,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load a course or return NotFound.
pub async fn ensure_course_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Course> {
    CourseRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Course", id }))
}

/// Reject edits by anyone but the owning instructor or an admin.
fn ensure_can_edit(user: &AuthUser, course: &Course) -> AppResult<()> {
    if user.is_admin() || course.instructor_id == Some(user.user_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the course instructor may edit this course".into(),
        )))
    }
}

/// Whether the viewer may open the course at all.
async fn ensure_can_view(
    pool: &sqlx::PgPool,
    user: &AuthUser,
    course: &Course,
) -> AppResult<()> {
    if !user.is_student() {
        // Admin sees everything; faculty see public courses and their own.
        if user.is_admin()
            || course.visibility == "public"
            || course.instructor_id == Some(user.user_id)
        {
            return Ok(());
        }
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this course".into(),
        )));
    }

    match Visibility::from_str_value(&course.visibility)
        .map_err(|e| AppError::InternalError(e))?
    {
        Visibility::Public => Ok(()),
        Visibility::Targeted => {
            let targeted = CourseRepo::is_targeted_to(pool, course.id, user.user_id).await?;
            let enrolled = EnrollmentRepo::find(pool, course.id, user.user_id)
                .await?
                .is_some();
            if targeted || enrolled {
                Ok(())
            } else {
                Err(AppError::Core(CoreError::Forbidden(
                    "This course is not available to you".into(),
                )))
            }
        }
        Visibility::Private => Err(AppError::Core(CoreError::Forbidden(
            "This course is private".into(),
        ))),
    }
}

/// Recompute and persist a targeted course's audience from its criteria.
///
/// Students matching the criteria (per-category OR, cross-category AND,
/// empty category = all) replace the previous join rows wholesale.
async fn apply_targeting(
    pool: &sqlx::PgPool,
    course_id: DbId,
    criteria: &TargetCriteria,
) -> AppResult<usize> {
    if criteria.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Select at least one targeting criterion (year, section, or department)".into(),
        )));
    }

    let student_ids = UserRepo::ids_by_role(pool, stepwise_core::roles::ROLE_STUDENT).await?;
    let attributes = ProfileRepo::targeting_attributes(pool, &student_ids).await?;

    let matched: Vec<DbId> = attributes
        .iter()
        .filter(|(_, attrs)| targeting::matches(criteria, attrs))
        .map(|(id, _)| *id)
        .collect();

    let count = CourseRepo::replace_targets(pool, course_id, &matched).await?;
    Ok(count)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/courses
///
/// Role-scoped listing: admins see every course, faculty see public plus
/// their own, students see public plus courses targeted at them.
pub async fn list_courses(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<CourseSearchParams>,
) -> AppResult<impl IntoResponse> {
    let courses = if user.is_admin() {
        CourseRepo::list_all(&state.pool, &params).await?
    } else if user.is_faculty() {
        CourseRepo::list_for_instructor(&state.pool, user.user_id, &params).await?
    } else {
        CourseRepo::list_for_student(&state.pool, user.user_id, &params).await?
    };

    Ok(Json(DataResponse { data: courses }))
}

/// GET /api/v1/courses/{id}
///
/// Course detail with enrollment count and the viewer's enrollment state.
pub async fn get_course(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let course = ensure_course_exists(&state.pool, id).await?;
    ensure_can_view(&state.pool, &user, &course).await?;

    let enrollment_count = EnrollmentRepo::count_by_course(&state.pool, id).await?;
    let is_enrolled = EnrollmentRepo::find(&state.pool, id, user.user_id)
        .await?
        .is_some();

    Ok(Json(DataResponse {
        data: CourseDetail {
            course,
            enrollment_count,
            is_enrolled,
        },
    }))
}

// ---------------------------------------------------------------------------
// Authoring
// ---------------------------------------------------------------------------

/// POST /api/v1/courses
///
/// Create a course. Faculty or admin. The slug is derived from the title;
/// duplicate slugs are rejected by `uq_courses_slug`.
pub async fn create_course(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
    Json(input): Json<SaveCourseRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SaveCourseResponse>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title is required".into(),
        )));
    }
    Visibility::from_str_value(&input.visibility)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let course = CourseRepo::create(
        &state.pool,
        &CreateCourse {
            title: input.title.clone(),
            slug: slugify(&input.title),
            description: input.description.clone(),
            thumbnail_url: input.thumbnail_url.clone(),
            video_url: input.video_url.clone(),
            tags: input.tags.clone(),
            instructor_id: user.user_id,
            visibility: input.visibility.clone(),
        },
    )
    .await?;

    let targeted_students = match (&input.visibility[..], &input.targeting) {
        ("targeted", Some(criteria)) => {
            Some(apply_targeting(&state.pool, course.id, criteria).await?)
        }
        ("targeted", None) => {
            return Err(AppError::Core(CoreError::Validation(
                "Targeted visibility requires targeting criteria".into(),
            )))
        }
        _ => None,
    };

    tracing::info!(course_id = course.id, instructor_id = user.user_id, "Course created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SaveCourseResponse {
                course,
                targeted_students,
            },
        }),
    ))
}

/// PUT /api/v1/courses/{id}
///
/// Update a course. Owning faculty or admin. A targeted save fully
/// replaces the audience join rows.
pub async fn update_course(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SaveCourseRequest>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_course_exists(&state.pool, id).await?;
    ensure_can_edit(&user, &existing)?;

    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title is required".into(),
        )));
    }
    Visibility::from_str_value(&input.visibility)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let course = CourseRepo::update(
        &state.pool,
        id,
        &UpdateCourse {
            title: Some(input.title.clone()),
            slug: Some(slugify(&input.title)),
            description: input.description.clone(),
            thumbnail_url: input.thumbnail_url.clone(),
            video_url: input.video_url.clone(),
            tags: Some(input.tags.clone()),
            visibility: Some(input.visibility.clone()),
        },
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Course", id }))?;

    let targeted_students = match (&input.visibility[..], &input.targeting) {
        ("targeted", Some(criteria)) => {
            Some(apply_targeting(&state.pool, course.id, criteria).await?)
        }
        ("targeted", None) => {
            return Err(AppError::Core(CoreError::Validation(
                "Targeted visibility requires targeting criteria".into(),
            )))
        }
        _ => None,
    };

    Ok(Json(DataResponse {
        data: SaveCourseResponse {
            course,
            targeted_students,
        },
    }))
}

/// DELETE /api/v1/courses/{id}
///
/// Delete a course and everything under it. Owning faculty or admin.
pub async fn delete_course(
    RequireFaculty(user): RequireFaculty,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let course = ensure_course_exists(&state.pool, id).await?;
    ensure_can_edit(&user, &course)?;

    CourseRepo::delete(&state.pool, id).await?;
    tracing::info!(course_id = id, user_id = user.user_id, "Course deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Enrollment
// ---------------------------------------------------------------------------

/// POST /api/v1/courses/{id}/enroll
///
/// Enroll the authenticated student. Double enrollment is rejected by the
/// unique constraint (409).
pub async fn enroll(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Enrollment>>)> {
    if !user.is_student() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only students enroll in courses".into(),
        )));
    }
    let course = ensure_course_exists(&state.pool, id).await?;
    ensure_can_view(&state.pool, &user, &course).await?;

    let enrollment = EnrollmentRepo::create(&state.pool, id, user.user_id).await?;
    tracing::info!(course_id = id, student_id = user.user_id, "Student enrolled");

    Ok((StatusCode::CREATED, Json(DataResponse { data: enrollment })))
}

/// DELETE /api/v1/courses/{id}/enroll
///
/// Drop the authenticated student's enrollment. Progress rows are kept.
pub async fn unenroll(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_course_exists(&state.pool, id).await?;

    let removed = EnrollmentRepo::delete(&state.pool, id, user.user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Enrollment",
            id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
