use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;

const TABLES: [&str; 6] = ["users", "students", "grades", "exam_sheets", "retakes", "sessions"];

async fn memory_pool() -> anyhow::Result<sqlx::SqlitePool> {
    let options = SqliteConnectOptions::new().in_memory(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}

#[tokio::test]
async fn migrations_apply_twice_and_tables_exist() -> anyhow::Result<()> {
    let pool = memory_pool().await?;

    let migrations_dir =
        std::env::var("RECORDS_MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string());
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(&migrations_dir)).await?;
    migrator.run(&pool).await?;
    migrator.run(&pool).await?;

    for table in TABLES {
        let row = sqlx::query("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_one(&pool)
            .await?;
        let count: i64 = row.try_get(0)?;
        assert_eq!(count, 1, "expected table {table} to exist after migrations");
    }

    Ok(())
}

#[tokio::test]
async fn schema_rejects_roles_outside_the_closed_set() -> anyhow::Result<()> {
    let pool = memory_pool().await?;
    sqlx::migrate::Migrator::new(std::path::Path::new("migrations")).await?.run(&pool).await?;

    let result = sqlx::query(
        "INSERT INTO users (username, hashed_password, role, full_name, group_link, created_at)
         VALUES ('root', 'x', 'superuser', 'Root', '', '2025-01-01 00:00:00')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "role CHECK constraint should reject unknown roles");

    let result = sqlx::query(
        "INSERT INTO sessions (id, username, role, full_name, theme, created_at, updated_at)
         VALUES ('s1', 'admin', NULL, NULL, 'light', '2025-01-01 00:00:00', '2025-01-01 00:00:00')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "partial session identity should be rejected");

    Ok(())
}

#[tokio::test]
async fn student_links_must_point_at_one_roster_entry() -> anyhow::Result<()> {
    let pool = memory_pool().await?;
    sqlx::migrate::Migrator::new(std::path::Path::new("migrations")).await?.run(&pool).await?;

    let dangling = sqlx::query(
        "INSERT INTO users (username, hashed_password, role, full_name, group_link, student_id, created_at)
         VALUES ('ghost', 'x', 'student', 'Ghost', '', 999, '2025-01-01 00:00:00')",
    )
    .execute(&pool)
    .await;
    assert!(dangling.is_err(), "link to a missing roster entry should be rejected");

    let student_id: i64 = sqlx::query_scalar(
        "INSERT INTO students (full_name, group_name) VALUES ('Ann', '1СОМ') RETURNING id",
    )
    .fetch_one(&pool)
    .await?;

    for username in ["ann.a", "ann.b"] {
        let result = sqlx::query(
            "INSERT INTO users (username, hashed_password, role, full_name, group_link, student_id, created_at)
             VALUES (?, 'x', 'student', 'Ann', '', ?, '2025-01-01 00:00:00')",
        )
        .bind(username)
        .bind(student_id)
        .execute(&pool)
        .await;
        assert_eq!(result.is_ok(), username == "ann.a", "only one account per roster entry");
    }

    Ok(())
}
