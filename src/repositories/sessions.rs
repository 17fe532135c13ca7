use sqlx::SqliteExecutor;
use time::PrimitiveDateTime;

use crate::db::models::SessionRow;
use crate::db::types::Theme;

const COLUMNS: &str = "id, username, role, full_name, theme, created_at, updated_at";

pub(crate) async fn create_anonymous(
    executor: impl SqliteExecutor<'_>,
    id: &str,
    theme: Theme,
    now: PrimitiveDateTime,
) -> Result<SessionRow, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>(&format!(
        "INSERT INTO sessions (id, username, role, full_name, theme, created_at, updated_at)
         VALUES (?, NULL, NULL, NULL, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(theme)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<SessionRow>, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>(&format!("SELECT {COLUMNS} FROM sessions WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Writes identity and theme columns from `row` in one statement.
pub(crate) async fn save(
    executor: impl SqliteExecutor<'_>,
    row: &SessionRow,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE sessions
         SET username = ?, role = ?, full_name = ?, theme = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(row.username.as_deref())
    .bind(row.role)
    .bind(row.full_name.as_deref())
    .bind(row.theme)
    .bind(row.updated_at)
    .bind(&row.id)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn delete(executor: impl SqliteExecutor<'_>, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE id = ?").bind(id).execute(executor).await?;
    Ok(())
}

/// Removes sessions created before `cutoff`; their tokens can no longer be
/// presented.
pub(crate) async fn delete_created_before(
    executor: impl SqliteExecutor<'_>,
    cutoff: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE created_at < ?")
        .bind(cutoff)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
pub(crate) async fn count(executor: impl SqliteExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM sessions").fetch_one(executor).await
}
