use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{SheetStatus, Theme, UserRole};

#[derive(Debug, Clone, FromRow)]
pub(crate) struct User {
    pub(crate) username: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) full_name: String,
    pub(crate) group_link: String,
    /// Roster entry a student account speaks for; set by an administrator.
    pub(crate) student_id: Option<i64>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub(crate) struct Student {
    pub(crate) id: i64,
    pub(crate) full_name: String,
    pub(crate) group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub(crate) struct Grade {
    pub(crate) id: i64,
    pub(crate) student_name: String,
    pub(crate) group_name: String,
    pub(crate) subject: String,
    pub(crate) type_of_work: String,
    pub(crate) grade: i64,
    pub(crate) date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub(crate) struct ExamSheet {
    pub(crate) id: i64,
    pub(crate) sheet_number: String,
    pub(crate) group_name: String,
    pub(crate) subject: String,
    pub(crate) control_type: String,
    pub(crate) exam_date: Date,
    pub(crate) examiner: String,
    pub(crate) status: SheetStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub(crate) struct Retake {
    pub(crate) id: i64,
    pub(crate) student_name: String,
    pub(crate) group_name: String,
    pub(crate) subject: String,
    pub(crate) reason: String,
    pub(crate) added_by: String,
    pub(crate) date_added: Date,
}

/// Persisted session row; identity columns are all set or all NULL.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct SessionRow {
    pub(crate) id: String,
    pub(crate) username: Option<String>,
    pub(crate) role: Option<UserRole>,
    pub(crate) full_name: Option<String>,
    pub(crate) theme: Theme,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
