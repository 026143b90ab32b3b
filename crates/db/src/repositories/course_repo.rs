//! Repository for the `courses` and `course_target_students` tables.

use sqlx::PgPool;
use stepwise_core::types::DbId;

use crate::models::course::{
    Course, CourseListing, CourseSearchParams, CreateCourse, UpdateCourse,
};

/// Column list for `courses` queries.
const COLUMNS: &str = "id, title, slug, description, thumbnail_url, video_url, tags, \
                        instructor_id, visibility, created_at, updated_at";

/// Column list for listing queries (aliased `c`, joined with instructor
/// profile).
const LISTING_COLUMNS: &str = "c.id, c.title, c.slug, c.description, c.thumbnail_url, c.tags, \
                                c.instructor_id, p.full_name AS instructor_name, c.visibility, \
                                c.created_at";

/// Shared optional-filter clause for the listing queries: `q` matches the
/// title case-insensitively, `tag` must be carried in the tags array.
const SEARCH_FILTER: &str = "($1::text IS NULL OR c.title ILIKE '%' || $1 || '%')
             AND ($2::text IS NULL OR c.tags @> ARRAY[$2])";

/// Provides CRUD and visibility-scoped listings for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (title, slug, description, thumbnail_url, video_url,
                                  tags, instructor_id, visibility)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.thumbnail_url)
            .bind(&input.video_url)
            .bind(&input.tags)
            .bind(input.instructor_id)
            .bind(&input.visibility)
            .fetch_one(pool)
            .await
    }

    /// Find a course by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a course. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                thumbnail_url = COALESCE($5, thumbnail_url),
                video_url = COALESCE($6, video_url),
                tags = COALESCE($7, tags),
                visibility = COALESCE($8, visibility)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.thumbnail_url)
            .bind(&input.video_url)
            .bind(&input.tags)
            .bind(&input.visibility)
            .fetch_optional(pool)
            .await
    }

    /// Delete a course. Modules, lessons, enrollments, and target rows
    /// cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List every course, newest first. Admin scope.
    pub async fn list_all(
        pool: &PgPool,
        params: &CourseSearchParams,
    ) -> Result<Vec<CourseListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM courses c
             LEFT JOIN profiles p ON p.user_id = c.instructor_id
             WHERE {SEARCH_FILTER}
             ORDER BY c.created_at DESC"
        );
        sqlx::query_as::<_, CourseListing>(&query)
            .bind(&params.q)
            .bind(&params.tag)
            .fetch_all(pool)
            .await
    }

    /// List public courses plus the instructor's own. Faculty scope.
    pub async fn list_for_instructor(
        pool: &PgPool,
        instructor_id: DbId,
        params: &CourseSearchParams,
    ) -> Result<Vec<CourseListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM courses c
             LEFT JOIN profiles p ON p.user_id = c.instructor_id
             WHERE {SEARCH_FILTER}
               AND (c.visibility = 'public' OR c.instructor_id = $3)
             ORDER BY c.created_at DESC"
        );
        sqlx::query_as::<_, CourseListing>(&query)
            .bind(&params.q)
            .bind(&params.tag)
            .bind(instructor_id)
            .fetch_all(pool)
            .await
    }

    /// List public courses plus courses targeted at the student. Student
    /// scope.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
        params: &CourseSearchParams,
    ) -> Result<Vec<CourseListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM courses c
             LEFT JOIN profiles p ON p.user_id = c.instructor_id
             WHERE {SEARCH_FILTER}
               AND (c.visibility = 'public'
                    OR c.id IN (SELECT course_id FROM course_target_students
                                WHERE student_id = $3))
             ORDER BY c.created_at DESC"
        );
        sqlx::query_as::<_, CourseListing>(&query)
            .bind(&params.q)
            .bind(&params.tag)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// Whether a targeted course's audience includes the student.
    pub async fn is_targeted_to(
        pool: &PgPool,
        course_id: DbId,
        student_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM course_target_students
             WHERE course_id = $1 AND student_id = $2",
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Replace a targeted course's audience with the given students.
    ///
    /// Target rows are fully replaced on every save, not diffed; both
    /// writes land in one transaction. Returns the new audience size.
    pub async fn replace_targets(
        pool: &PgPool,
        course_id: DbId,
        student_ids: &[DbId],
    ) -> Result<usize, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM course_target_students WHERE course_id = $1")
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO course_target_students (course_id, student_id)
             SELECT $1, unnest($2::bigint[])",
        )
        .bind(course_id)
        .bind(student_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(student_ids.len())
    }
}
