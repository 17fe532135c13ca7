use sqlx::SqliteExecutor;
use time::Date;

use crate::db::models::Retake;

const COLUMNS: &str = "id, student_name, group_name, subject, reason, added_by, date_added";

pub(crate) struct CreateRetake<'a> {
    pub(crate) student_name: &'a str,
    pub(crate) group_name: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) reason: &'a str,
    pub(crate) added_by: &'a str,
    pub(crate) date_added: Date,
}

pub(crate) async fn create(
    executor: impl SqliteExecutor<'_>,
    params: CreateRetake<'_>,
) -> Result<Retake, sqlx::Error> {
    sqlx::query_as::<_, Retake>(&format!(
        "INSERT INTO retakes (student_name, group_name, subject, reason, added_by, date_added)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(params.student_name)
    .bind(params.group_name)
    .bind(params.subject)
    .bind(params.reason)
    .bind(params.added_by)
    .bind(params.date_added)
    .fetch_one(executor)
    .await
}

/// Insertion order, which doubles as the display order.
pub(crate) async fn list_by_group_subject(
    executor: impl SqliteExecutor<'_>,
    group_name: &str,
    subject: &str,
) -> Result<Vec<Retake>, sqlx::Error> {
    sqlx::query_as::<_, Retake>(&format!(
        "SELECT {COLUMNS} FROM retakes WHERE group_name = ? AND subject = ? ORDER BY id"
    ))
    .bind(group_name)
    .bind(subject)
    .fetch_all(executor)
    .await
}

pub(crate) async fn delete_by_id(
    executor: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM retakes WHERE id = ?").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
pub(crate) async fn count(executor: impl SqliteExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM retakes").fetch_one(executor).await
}
