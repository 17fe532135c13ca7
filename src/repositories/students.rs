use sqlx::SqliteExecutor;

use crate::db::models::Student;

const COLUMNS: &str = "id, full_name, group_name";

pub(crate) async fn create(
    executor: impl SqliteExecutor<'_>,
    full_name: &str,
    group_name: &str,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (full_name, group_name) VALUES (?, ?) RETURNING {COLUMNS}"
    ))
    .bind(full_name)
    .bind(group_name)
    .fetch_one(executor)
    .await
}

pub(crate) async fn insert_if_absent(
    executor: impl SqliteExecutor<'_>,
    full_name: &str,
    group_name: &str,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("INSERT OR IGNORE INTO students (full_name, group_name) VALUES (?, ?)")
            .bind(full_name)
            .bind(group_name)
            .execute(executor)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_by_group(
    executor: impl SqliteExecutor<'_>,
    group_name: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students WHERE group_name = ? ORDER BY full_name, id"
    ))
    .bind(group_name)
    .fetch_all(executor)
    .await
}

pub(crate) async fn exists_in_group(
    executor: impl SqliteExecutor<'_>,
    group_name: &str,
    full_name: &str,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM students WHERE group_name = ? AND full_name = ?")
            .bind(group_name)
            .bind(full_name)
            .fetch_optional(executor)
            .await?;
    Ok(found.is_some())
}

pub(crate) async fn groups_of(
    executor: impl SqliteExecutor<'_>,
    full_name: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT group_name FROM students WHERE full_name = ? ORDER BY group_name")
        .bind(full_name)
        .fetch_all(executor)
        .await
}

pub(crate) async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Roster entry an account is linked to, if any.
pub(crate) async fn find_linked_to_user(
    executor: impl SqliteExecutor<'_>,
    username: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT s.id, s.full_name, s.group_name
         FROM students s
         JOIN users u ON u.student_id = s.id
         WHERE u.username = ?",
    )
    .bind(username)
    .fetch_optional(executor)
    .await
}
