use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema and seed data.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    // Health check
    stepwise_db::health_check(&pool).await.unwrap();

    // Roles are seeded in a fixed order.
    let names: Vec<String> = sqlx::query_scalar("SELECT name FROM roles ORDER BY id")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(names, ["admin", "faculty", "student"]);

    // Core tables exist and start empty.
    let tables = [
        "users",
        "profiles",
        "courses",
        "course_target_students",
        "modules",
        "lessons",
        "quizzes",
        "questions",
        "options",
        "enrollments",
        "lesson_progress",
        "quiz_attempts",
        "question_responses",
        "site_settings",
        "notifications",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// updated_at advances on UPDATE via the shared trigger.
#[sqlx::test(migrations = "./migrations")]
async fn test_updated_at_trigger(pool: PgPool) {
    let before: (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("SELECT updated_at FROM roles WHERE name = 'student'")
            .fetch_one(&pool)
            .await
            .unwrap();

    sqlx::query("UPDATE roles SET description = 'learner' WHERE name = 'student'")
        .execute(&pool)
        .await
        .unwrap();

    let after: (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("SELECT updated_at FROM roles WHERE name = 'student'")
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(after.0 >= before.0);
}
