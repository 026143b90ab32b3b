//! HTTP-level integration tests for the course catalog: visibility
//! scoping, targeted audiences, slugs, and edit authorization.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth, seed_user};
use sqlx::PgPool;

/// Seed a user, log them in, and fill in targeting attributes.
async fn seed_student_with_profile(
    pool: &PgPool,
    username: &str,
    year: &str,
    section: &str,
    department: &str,
) -> String {
    let (user_id, password) = seed_user(pool, username, "student").await;
    sqlx::query(
        "UPDATE profiles SET year = $2, section = $3, department = $4 WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(year)
    .bind(section)
    .bind(department)
    .execute(pool)
    .await
    .unwrap();
    common::login_token(common::build_test_app(pool.clone()), username, &password).await
}

/// Create a course as the given user and return its id.
async fn create_course(
    pool: &PgPool,
    token: &str,
    body: serde_json::Value,
) -> i64 {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/courses",
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Course titles turn into hyphenated lowercase slugs; a duplicate title
/// collides on the slug constraint with 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_slug_derivation_and_uniqueness(pool: PgPool) {
    let (_, password) = seed_user(&pool, "prof", "faculty").await;
    let token = common::login_token(common::build_test_app(pool.clone()), "prof", &password).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/courses",
        serde_json::json!({ "title": "Intro to Rust!", "visibility": "public" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "intro-to-rust");

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/courses",
        serde_json::json!({ "title": "Intro to Rust", "visibility": "public" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Listing scope per role: admins see everything, faculty see public plus
/// their own, students see public plus courses targeted at them.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_listing_visibility_scopes(pool: PgPool) {
    let (_, admin_pw) = seed_user(&pool, "root", "admin").await;
    let (_, prof_pw) = seed_user(&pool, "prof", "faculty").await;
    let (_, rival_pw) = seed_user(&pool, "rival", "faculty").await;
    let admin_token =
        common::login_token(common::build_test_app(pool.clone()), "root", &admin_pw).await;
    let prof_token =
        common::login_token(common::build_test_app(pool.clone()), "prof", &prof_pw).await;
    let rival_token =
        common::login_token(common::build_test_app(pool.clone()), "rival", &rival_pw).await;

    let student_token =
        seed_student_with_profile(&pool, "alice", "2nd Year", "B", "CSE").await;

    create_course(
        &pool,
        &prof_token,
        serde_json::json!({ "title": "Open Course", "visibility": "public" }),
    )
    .await;
    create_course(
        &pool,
        &prof_token,
        serde_json::json!({ "title": "Hidden Course", "visibility": "private" }),
    )
    .await;
    create_course(
        &pool,
        &prof_token,
        serde_json::json!({
            "title": "CSE Only",
            "visibility": "targeted",
            "targeting": { "departments": ["CSE"] }
        }),
    )
    .await;

    let count_for = |json: &serde_json::Value| json["data"].as_array().unwrap().len();

    let json = body_json(
        get_auth(common::build_test_app(pool.clone()), "/api/v1/courses", &admin_token).await,
    )
    .await;
    assert_eq!(count_for(&json), 3, "admin sees every course");

    let json = body_json(
        get_auth(common::build_test_app(pool.clone()), "/api/v1/courses", &prof_token).await,
    )
    .await;
    assert_eq!(count_for(&json), 3, "owner sees their private and targeted");

    let json = body_json(
        get_auth(common::build_test_app(pool.clone()), "/api/v1/courses", &rival_token).await,
    )
    .await;
    assert_eq!(count_for(&json), 1, "other faculty see public only");

    let json = body_json(
        get_auth(common::build_test_app(pool.clone()), "/api/v1/courses", &student_token).await,
    )
    .await;
    assert_eq!(count_for(&json), 2, "CSE student sees public + targeted");

    // A student outside the audience sees only the public course.
    let outsider_token =
        seed_student_with_profile(&pool, "bob", "2nd Year", "B", "ME").await;
    let json = body_json(
        get_auth(common::build_test_app(pool), "/api/v1/courses", &outsider_token).await,
    )
    .await;
    assert_eq!(count_for(&json), 1);
}

/// A targeted save without criteria is rejected; a re-save recomputes the
/// audience wholesale.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_targeting_recompute(pool: PgPool) {
    let (_, prof_pw) = seed_user(&pool, "prof", "faculty").await;
    let prof_token =
        common::login_token(common::build_test_app(pool.clone()), "prof", &prof_pw).await;
    seed_student_with_profile(&pool, "alice", "2nd Year", "B", "CSE").await;
    seed_student_with_profile(&pool, "bob", "3rd Year", "A", "ECE").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/courses",
        serde_json::json!({ "title": "No Criteria", "visibility": "targeted" }),
        &prof_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let course_id = create_course(
        &pool,
        &prof_token,
        serde_json::json!({
            "title": "Audience Course",
            "visibility": "targeted",
            "targeting": { "departments": ["CSE"] }
        }),
    )
    .await;

    let audience: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM course_target_students WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(audience, 1);

    // Re-save widening the audience to both departments.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/courses/{course_id}"),
        serde_json::json!({
            "title": "Audience Course",
            "visibility": "targeted",
            "targeting": { "departments": ["CSE", "ECE"] }
        }),
        &prof_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["targeted_students"], 2);
}

/// Faculty cannot edit courses they do not own; admins can.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_edit_authorization(pool: PgPool) {
    let (_, admin_pw) = seed_user(&pool, "root", "admin").await;
    let (_, prof_pw) = seed_user(&pool, "prof", "faculty").await;
    let (_, rival_pw) = seed_user(&pool, "rival", "faculty").await;
    let admin_token =
        common::login_token(common::build_test_app(pool.clone()), "root", &admin_pw).await;
    let prof_token =
        common::login_token(common::build_test_app(pool.clone()), "prof", &prof_pw).await;
    let rival_token =
        common::login_token(common::build_test_app(pool.clone()), "rival", &rival_pw).await;

    let course_id = create_course(
        &pool,
        &prof_token,
        serde_json::json!({ "title": "Owned Course", "visibility": "public" }),
    )
    .await;

    let update = serde_json::json!({ "title": "Owned Course", "visibility": "private" });

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/courses/{course_id}"),
        update.clone(),
        &rival_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/courses/{course_id}"),
        update,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
