//! Course entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// A course row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub tags: Vec<String>,
    pub instructor_id: Option<DbId>,
    /// `public`, `private`, or `targeted`.
    pub visibility: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A course joined with its instructor's display name, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseListing {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
    pub instructor_id: Option<DbId>,
    pub instructor_name: Option<String>,
    pub visibility: String,
    pub created_at: Timestamp,
}

/// DTO for creating a course.
#[derive(Debug)]
pub struct CreateCourse {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub tags: Vec<String>,
    pub instructor_id: DbId,
    pub visibility: String,
}

/// DTO for updating a course. All fields are optional.
#[derive(Debug, Default)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub visibility: Option<String>,
}

/// A targeted-course audience row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseTargetStudent {
    pub id: DbId,
    pub course_id: DbId,
    pub student_id: DbId,
    pub created_at: Timestamp,
}

/// Query parameters accepted by the course listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CourseSearchParams {
    /// Case-insensitive substring match on title.
    pub q: Option<String>,
    pub tag: Option<String>,
}
