use sqlx::SqliteExecutor;
use time::Date;

use crate::db::models::ExamSheet;
use crate::db::types::SheetStatus;

const COLUMNS: &str =
    "id, sheet_number, group_name, subject, control_type, exam_date, examiner, status";

pub(crate) struct CreateExamSheet<'a> {
    pub(crate) sheet_number: &'a str,
    pub(crate) group_name: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) control_type: &'a str,
    pub(crate) exam_date: Date,
    pub(crate) examiner: &'a str,
    pub(crate) status: SheetStatus,
}

pub(crate) async fn create(
    executor: impl SqliteExecutor<'_>,
    params: CreateExamSheet<'_>,
) -> Result<ExamSheet, sqlx::Error> {
    sqlx::query_as::<_, ExamSheet>(&format!(
        "INSERT INTO exam_sheets
            (sheet_number, group_name, subject, control_type, exam_date, examiner, status)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(params.sheet_number)
    .bind(params.group_name)
    .bind(params.subject)
    .bind(params.control_type)
    .bind(params.exam_date)
    .bind(params.examiner)
    .bind(params.status)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list_by_group_subject(
    executor: impl SqliteExecutor<'_>,
    group_name: &str,
    subject: &str,
) -> Result<Vec<ExamSheet>, sqlx::Error> {
    sqlx::query_as::<_, ExamSheet>(&format!(
        "SELECT {COLUMNS} FROM exam_sheets WHERE group_name = ? AND subject = ? ORDER BY id"
    ))
    .bind(group_name)
    .bind(subject)
    .fetch_all(executor)
    .await
}

/// Newest sheet with status `open` for the pair, if any.
pub(crate) async fn find_active(
    executor: impl SqliteExecutor<'_>,
    group_name: &str,
    subject: &str,
) -> Result<Option<ExamSheet>, sqlx::Error> {
    sqlx::query_as::<_, ExamSheet>(&format!(
        "SELECT {COLUMNS} FROM exam_sheets
         WHERE group_name = ? AND subject = ? AND status = ?
         ORDER BY id DESC
         LIMIT 1"
    ))
    .bind(group_name)
    .bind(subject)
    .bind(SheetStatus::Open)
    .fetch_optional(executor)
    .await
}
