use sqlx::SqliteExecutor;
use time::Date;

use crate::db::models::Grade;

pub(crate) const COLUMNS: &str =
    "id, student_name, group_name, subject, type_of_work, grade, date";

pub(crate) struct CreateGrade<'a> {
    pub(crate) student_name: &'a str,
    pub(crate) group_name: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) type_of_work: &'a str,
    pub(crate) grade: i64,
    pub(crate) date: Date,
}

pub(crate) async fn create(
    executor: impl SqliteExecutor<'_>,
    params: CreateGrade<'_>,
) -> Result<Grade, sqlx::Error> {
    sqlx::query_as::<_, Grade>(&format!(
        "INSERT INTO grades (student_name, group_name, subject, type_of_work, grade, date)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(params.student_name)
    .bind(params.group_name)
    .bind(params.subject)
    .bind(params.type_of_work)
    .bind(params.grade)
    .bind(params.date)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list_by_group_subject(
    executor: impl SqliteExecutor<'_>,
    group_name: &str,
    subject: &str,
) -> Result<Vec<Grade>, sqlx::Error> {
    sqlx::query_as::<_, Grade>(&format!(
        "SELECT {COLUMNS} FROM grades WHERE group_name = ? AND subject = ? ORDER BY id"
    ))
    .bind(group_name)
    .bind(subject)
    .fetch_all(executor)
    .await
}

pub(crate) async fn list_by_group(
    executor: impl SqliteExecutor<'_>,
    group_name: &str,
) -> Result<Vec<Grade>, sqlx::Error> {
    sqlx::query_as::<_, Grade>(&format!(
        "SELECT {COLUMNS} FROM grades WHERE group_name = ? ORDER BY id"
    ))
    .bind(group_name)
    .fetch_all(executor)
    .await
}

pub(crate) async fn list_by_student(
    executor: impl SqliteExecutor<'_>,
    student_name: &str,
) -> Result<Vec<Grade>, sqlx::Error> {
    sqlx::query_as::<_, Grade>(&format!(
        "SELECT {COLUMNS} FROM grades WHERE student_name = ? ORDER BY subject, date, id"
    ))
    .bind(student_name)
    .fetch_all(executor)
    .await
}
