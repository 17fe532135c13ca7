use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

use crate::core::time::format_date;
use crate::db::models::Grade;
use crate::schemas::deserialize_optional_date;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GradeCreate {
    #[validate(length(min = 1, message = "student must not be empty"))]
    pub(crate) student: String,
    #[validate(length(min = 1, message = "group must not be empty"))]
    pub(crate) group: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: String,
    #[serde(alias = "typeOfWork")]
    #[validate(length(min = 1, max = 100, message = "type_of_work must be 1-100 characters long"))]
    pub(crate) type_of_work: String,
    pub(crate) grade: i64,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GradeResponse {
    pub(crate) id: i64,
    pub(crate) student: String,
    pub(crate) group: String,
    pub(crate) subject: String,
    pub(crate) type_of_work: String,
    pub(crate) grade: i64,
    pub(crate) date: String,
}

impl From<Grade> for GradeResponse {
    fn from(grade: Grade) -> Self {
        Self {
            id: grade.id,
            student: grade.student_name,
            group: grade.group_name,
            subject: grade.subject,
            type_of_work: grade.type_of_work,
            grade: grade.grade,
            date: format_date(grade.date),
        }
    }
}
