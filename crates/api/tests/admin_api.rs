//! HTTP-level integration tests for site administration: settings
//! round-trip, user management, analytics, and notifications.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth, seed_user};
use sqlx::PgPool;

/// Settings GET returns defaults on an empty table; PUT then GET
/// round-trips the struct.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_settings_round_trip(pool: PgPool) {
    let (_, password) = seed_user(&pool, "root", "admin").await;
    let token = common::login_token(common::build_test_app(pool.clone()), "root", &password).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/settings",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let defaults = body_json(response).await;
    assert_eq!(defaults["data"]["site_name"], "Stepwise");
    assert_eq!(defaults["data"]["default_user_role"], "student");
    assert_eq!(defaults["data"]["maintenance_mode"], false);

    let mut updated = defaults["data"].clone();
    updated["site_name"] = "Night School".into();
    updated["maintenance_mode"] = true.into();
    updated["max_file_upload_size"] = 25.into();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/settings",
        updated.clone(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/settings",
        &token,
    )
    .await;
    let reloaded = body_json(response).await;
    assert_eq!(reloaded["data"], updated);
}

/// An unknown default role is rejected on save.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_settings_reject_unknown_role(pool: PgPool) {
    let (_, password) = seed_user(&pool, "root", "admin").await;
    let token = common::login_token(common::build_test_app(pool.clone()), "root", &password).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/settings",
        &token,
    )
    .await;
    let mut settings = body_json(response).await["data"].clone();
    settings["default_user_role"] = "superuser".into();

    let response = put_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/settings",
        settings,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Admin lists users with profile fields and changes a role; the change
/// revokes the user's sessions.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_management(pool: PgPool) {
    let (_, admin_password) = seed_user(&pool, "root", "admin").await;
    let (student_id, student_password) = seed_user(&pool, "bob", "student").await;
    let admin_token =
        common::login_token(common::build_test_app(pool.clone()), "root", &admin_password).await;

    // Log the student in so they hold a refresh session.
    let login = body_json(
        common::post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/auth/login",
            serde_json::json!({ "username": "bob", "password": student_password }),
        )
        .await,
    )
    .await;
    let student_refresh = login["refresh_token"].as_str().unwrap().to_string();

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/users",
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);

    // Promote bob to faculty.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/users/{student_id}/role"),
        serde_json::json!({ "role": "faculty" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "faculty");

    // The role change ended bob's sessions.
    let response = common::post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": student_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown roles are rejected.
    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/users/{student_id}/role"),
        serde_json::json!({ "role": "emperor" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// The analytics payload aggregates counts without error on seeded data.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_analytics(pool: PgPool) {
    let (_, password) = seed_user(&pool, "root", "admin").await;
    seed_user(&pool, "carol", "student").await;
    let token = common::login_token(common::build_test_app(pool.clone()), "root", &password).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/analytics",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["counts"]["total_users"], 2);
    assert_eq!(json["data"]["counts"]["total_students"], 1);
    assert_eq!(json["data"]["quiz_outcomes"]["total_attempts"], 0);
    assert!(json["data"]["user_growth"].as_array().unwrap().len() >= 1);
}

/// Notifications: list, mark one read, mark all read; other users'
/// notifications are untouchable.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_notifications(pool: PgPool) {
    let (user_id, password) = seed_user(&pool, "dana", "student").await;
    let (other_id, _) = seed_user(&pool, "evan", "student").await;
    let token = common::login_token(common::build_test_app(pool.clone()), "dana", &password).await;

    for (uid, title) in [(user_id, "Welcome"), (user_id, "Reminder"), (other_id, "Private")] {
        sqlx::query("INSERT INTO notifications (user_id, title) VALUES ($1, $2)")
            .bind(uid)
            .bind(title)
            .execute(&pool)
            .await
            .unwrap();
    }

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications",
        &token,
    )
    .await;
    let json = body_json(response).await;
    let list = json["data"].as_array().unwrap();
    assert_eq!(list.len(), 2, "only the caller's notifications are listed");
    let first_id = list[0]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notifications/{first_id}/read"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Another user's notification 404s rather than leaking.
    let foreign_id: i64 =
        sqlx::query_scalar("SELECT id FROM notifications WHERE user_id = $1")
            .bind(other_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notifications/{foreign_id}/read"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/notifications/read-all",
        serde_json::json!({}),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["updated"], 1);
}
