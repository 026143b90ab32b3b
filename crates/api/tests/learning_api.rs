//! HTTP-level integration tests for the course-consumption flow: the
//! gated step list, lesson completion, and quiz submission.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_json_auth, put_json_auth, seed_user,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Scenario helpers
// ---------------------------------------------------------------------------

/// Faculty-author a course with two steps; step 1 carries a single-choice
/// quiz whose correct answer is "A". Returns `(course_id, faculty_token)`.
async fn author_course(pool: &PgPool) -> (i64, String) {
    let (_, password) = seed_user(pool, "prof", "faculty").await;
    let token = common::login_token(common::build_test_app(pool.clone()), "prof", &password).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/courses",
        serde_json::json!({
            "title": "Step Gated Rust",
            "description": "Two gated steps",
            "visibility": "public"
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let course_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/courses/{course_id}/steps"),
        serde_json::json!({
            "title": "Ownership",
            "content": "<p>Read about ownership.</p>",
            "quiz": {
                "questions": [{
                    "text": "Pick A",
                    "qtype": "single",
                    "options": [
                        { "text": "A", "is_correct": true },
                        { "text": "B", "is_correct": false }
                    ]
                }]
            }
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/courses/{course_id}/steps"),
        serde_json::json!({
            "title": "Borrowing",
            "content": "<p>Read about borrowing.</p>"
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    (course_id, token)
}

/// Seed and enroll a student. Returns their token.
async fn enroll_student(pool: &PgPool, course_id: i64) -> String {
    let (_, password) = seed_user(pool, "alice", "student").await;
    let token = common::login_token(common::build_test_app(pool.clone()), "alice", &password).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/courses/{course_id}/enroll"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    token
}

/// Fetch the step list as the given user.
async fn fetch_steps(pool: &PgPool, course_id: i64, token: &str) -> serde_json::Value {
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/courses/{course_id}/steps"),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Students without an enrollment are turned away before any step data is
/// built; faculty bypass the check.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_enrollment_gate(pool: PgPool) {
    let (course_id, faculty_token) = author_course(&pool).await;
    let (_, password) = seed_user(&pool, "outsider", "student").await;
    let token =
        common::login_token(common::build_test_app(pool.clone()), "outsider", &password).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/courses/{course_id}/steps"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The instructor sees the steps without enrolling.
    let json = fetch_steps(&pool, course_id, &faculty_token).await;
    assert_eq!(json["data"]["steps"].as_array().unwrap().len(), 2);
}

/// A fresh enrollment sees step 1 unlocked with the quiz attached (answer
/// key withheld) and step 2 locked.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_initial_lock_state_and_key_stripping(pool: PgPool) {
    let (course_id, faculty_token) = author_course(&pool).await;
    let student_token = enroll_student(&pool, course_id).await;

    let json = fetch_steps(&pool, course_id, &student_token).await;
    let steps = json["data"]["steps"].as_array().unwrap();

    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0]["is_locked"], false);
    assert_eq!(steps[1]["is_locked"], true);
    assert_eq!(json["data"]["current_step"], 0);

    // Students never see is_correct on options.
    let options = steps[0]["quiz"]["questions"][0]["options"].as_array().unwrap();
    assert!(options.iter().all(|o| o.get("is_correct").is_none()));

    // The instructor's view carries the key.
    let json = fetch_steps(&pool, course_id, &faculty_token).await;
    let options =
        json["data"]["steps"][0]["quiz"]["questions"][0]["options"].as_array().unwrap();
    assert!(options.iter().any(|o| o["is_correct"] == true));
}

/// The end-to-end scenario: fail the quiz (0%, step 2 stays locked),
/// retry and pass (100%, step 2 unlocks), history retained.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_submit_fail_retry_pass(pool: PgPool) {
    let (course_id, _) = author_course(&pool).await;
    let student_token = enroll_student(&pool, course_id).await;

    let json = fetch_steps(&pool, course_id, &student_token).await;
    let quiz = &json["data"]["steps"][0]["quiz"];
    let quiz_id = quiz["id"].as_i64().unwrap();
    let question = &quiz["questions"][0];
    let question_id = question["id"].as_i64().unwrap();
    let options = question["options"].as_array().unwrap();

    // The student cannot tell A from B by the payload; pick by text.
    let option_id = |text: &str| {
        options
            .iter()
            .find(|o| o["text"] == text)
            .unwrap()["id"]
            .as_i64()
            .unwrap()
    };

    // Submit "B": 0%, not passed, step 2 still locked.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/quizzes/{quiz_id}/attempts"),
        serde_json::json!({
            "answers": [{ "question_id": question_id, "selected_option_ids": [option_id("B")] }]
        }),
        &student_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["passed"], false);
    assert_eq!(json["data"]["attempt"]["percentage"], 0.0);
    assert_eq!(json["data"]["passing_score"], 70);
    // The result reveals the key for highlighting.
    assert_eq!(
        json["data"]["results"][0]["correct_option_ids"][0],
        option_id("A")
    );

    let json = fetch_steps(&pool, course_id, &student_token).await;
    assert_eq!(json["data"]["steps"][1]["is_locked"], true);

    // Retry with "A": 100%, passed, lesson completed, step 2 unlocked.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/quizzes/{quiz_id}/attempts"),
        serde_json::json!({
            "answers": [{ "question_id": question_id, "selected_option_ids": [option_id("A")] }]
        }),
        &student_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["passed"], true);
    assert_eq!(json["data"]["attempt"]["percentage"], 100.0);
    assert!(json["data"]["completed_lesson_id"].is_number());

    let json = fetch_steps(&pool, course_id, &student_token).await;
    assert_eq!(json["data"]["steps"][0]["is_completed"], true);
    assert_eq!(json["data"]["steps"][1]["is_locked"], false);

    // Both attempts are retained, newest first.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/quizzes/{quiz_id}/attempts"),
        &student_token,
    )
    .await;
    let json = body_json(response).await;
    let attempts = json["data"].as_array().unwrap();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0]["percentage"], 100.0);
    assert_eq!(attempts[1]["percentage"], 0.0);
}

/// A quiz-backed step rejects manual completion; a quiz-less step accepts
/// it and unlocks nothing it should not.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_manual_completion_bifurcation(pool: PgPool) {
    let (course_id, _) = author_course(&pool).await;
    let student_token = enroll_student(&pool, course_id).await;

    let json = fetch_steps(&pool, course_id, &student_token).await;
    let quiz_lesson = json["data"]["steps"][0]["lesson_id"].as_i64().unwrap();
    let free_lesson = json["data"]["steps"][1]["lesson_id"].as_i64().unwrap();

    // Step 1 has a quiz: manual completion is refused.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/lessons/{quiz_lesson}/complete"),
        serde_json::json!({}),
        &student_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Step 2 has no quiz: completion works and is idempotent.
    for _ in 0..2 {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/lessons/{free_lesson}/complete"),
            serde_json::json!({}),
            &student_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM lesson_progress WHERE lesson_id = $1",
    )
    .bind(free_lesson)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

/// Re-fetching the step list without intervening writes yields an
/// identical payload.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_step_list_is_idempotent(pool: PgPool) {
    let (course_id, _) = author_course(&pool).await;
    let student_token = enroll_student(&pool, course_id).await;

    let first = fetch_steps(&pool, course_id, &student_token).await;
    let second = fetch_steps(&pool, course_id, &student_token).await;
    assert_eq!(first, second);
}

/// Unenrolling closes the gate again.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unenroll_revokes_access(pool: PgPool) {
    let (course_id, _) = author_course(&pool).await;
    let student_token = enroll_student(&pool, course_id).await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/courses/{course_id}/enroll"),
        &student_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/courses/{course_id}/steps"),
        &student_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Editing a step replaces its quiz questions wholesale; the learner sees
/// the new set.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_step_edit_replaces_questions(pool: PgPool) {
    let (course_id, faculty_token) = author_course(&pool).await;
    let student_token = enroll_student(&pool, course_id).await;

    let json = fetch_steps(&pool, course_id, &student_token).await;
    let module_id = json["data"]["steps"][0]["module_id"].as_i64().unwrap();
    let old_question_id =
        json["data"]["steps"][0]["quiz"]["questions"][0]["id"].as_i64().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/courses/{course_id}/steps/{module_id}"),
        serde_json::json!({
            "title": "Ownership",
            "content": "<p>Read about ownership.</p>",
            "quiz": {
                "questions": [{
                    "text": "Pick C this time",
                    "qtype": "single",
                    "options": [
                        { "text": "C", "is_correct": true },
                        { "text": "D", "is_correct": false }
                    ]
                }]
            }
        }),
        &faculty_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = fetch_steps(&pool, course_id, &student_token).await;
    let question = &json["data"]["steps"][0]["quiz"]["questions"][0];
    assert_eq!(question["text"], "Pick C this time");
    assert_ne!(question["id"].as_i64().unwrap(), old_question_id);
}
