use sqlx::SqliteExecutor;

use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str =
    "username, hashed_password, role, full_name, group_link, student_id, created_at";

pub(crate) struct CreateUser<'a> {
    pub(crate) username: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) full_name: &'a str,
    pub(crate) group_link: &'a str,
    pub(crate) student_id: Option<i64>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn find_by_username(
    executor: impl SqliteExecutor<'_>,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = ?"))
        .bind(username)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn exists(
    executor: impl SqliteExecutor<'_>,
    username: &str,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn create(
    executor: impl SqliteExecutor<'_>,
    params: CreateUser<'_>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users
             (username, hashed_password, role, full_name, group_link, student_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(params.username)
    .bind(params.hashed_password)
    .bind(params.role)
    .bind(params.full_name)
    .bind(params.group_link)
    .bind(params.student_id)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

/// `INSERT OR IGNORE`: returns whether a row was written. Only the startup
/// seed uses this; regular creation must surface duplicates.
pub(crate) async fn insert_if_absent(
    executor: impl SqliteExecutor<'_>,
    params: CreateUser<'_>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO users
             (username, hashed_password, role, full_name, group_link, student_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(params.username)
    .bind(params.hashed_password)
    .bind(params.role)
    .bind(params.full_name)
    .bind(params.group_link)
    .bind(params.student_id)
    .bind(params.created_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn student_link_taken(
    executor: impl SqliteExecutor<'_>,
    student_id: i64,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE student_id = ?")
        .bind(student_id)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

#[cfg(test)]
pub(crate) async fn count_by_username(
    executor: impl SqliteExecutor<'_>,
    username: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(executor)
        .await
}
