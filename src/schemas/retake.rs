use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_date;
use crate::db::models::Retake;
use crate::schemas::exam_sheet::ExamSheetResponse;
use crate::services::retakes::RetakeStatus;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RetakeCreate {
    #[validate(length(min = 1, message = "group must not be empty"))]
    pub(crate) group: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: String,
    #[validate(length(min = 1, message = "student must not be empty"))]
    pub(crate) student: String,
    #[validate(length(min = 1, max = 500, message = "reason must be 1-500 characters long"))]
    pub(crate) reason: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RetakeResponse {
    pub(crate) id: i64,
    pub(crate) student: String,
    pub(crate) group: String,
    pub(crate) subject: String,
    pub(crate) reason: String,
    pub(crate) added_by: String,
    pub(crate) date_added: String,
}

impl From<Retake> for RetakeResponse {
    fn from(retake: Retake) -> Self {
        Self {
            id: retake.id,
            student: retake.student_name,
            group: retake.group_name,
            subject: retake.subject,
            reason: retake.reason,
            added_by: retake.added_by,
            date_added: format_date(retake.date_added),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RetakeStatusResponse {
    pub(crate) group: String,
    pub(crate) subject: String,
    pub(crate) enrollment_open: bool,
    pub(crate) active_sheet: Option<ExamSheetResponse>,
    pub(crate) students: Vec<String>,
}

impl RetakeStatusResponse {
    pub(crate) fn new(group: String, subject: String, status: RetakeStatus) -> Self {
        Self {
            group,
            subject,
            enrollment_open: status.enrollment_open(),
            active_sheet: status.active_sheet.map(ExamSheetResponse::from),
            students: status.students,
        }
    }
}
