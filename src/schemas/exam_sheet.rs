use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

use crate::core::time::format_date;
use crate::db::models::ExamSheet;
use crate::db::types::SheetStatus;
use crate::schemas::deserialize_date;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamSheetCreate {
    #[serde(alias = "sheetNumber")]
    #[validate(length(min = 1, max = 50, message = "sheet_number must be 1-50 characters long"))]
    pub(crate) sheet_number: String,
    #[validate(length(min = 1, message = "group must not be empty"))]
    pub(crate) group: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: String,
    #[serde(alias = "controlType")]
    #[validate(length(min = 1, max = 100, message = "control_type must be 1-100 characters long"))]
    pub(crate) control_type: String,
    #[serde(alias = "examDate", deserialize_with = "deserialize_date")]
    pub(crate) exam_date: Date,
    #[validate(length(min = 1, max = 200, message = "examiner must be 1-200 characters long"))]
    pub(crate) examiner: String,
    #[serde(default = "default_status")]
    pub(crate) status: SheetStatus,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamSheetResponse {
    pub(crate) id: i64,
    pub(crate) sheet_number: String,
    pub(crate) group: String,
    pub(crate) subject: String,
    pub(crate) control_type: String,
    pub(crate) exam_date: String,
    pub(crate) examiner: String,
    pub(crate) status: SheetStatus,
}

impl From<ExamSheet> for ExamSheetResponse {
    fn from(sheet: ExamSheet) -> Self {
        Self {
            id: sheet.id,
            sheet_number: sheet.sheet_number,
            group: sheet.group_name,
            subject: sheet.subject,
            control_type: sheet.control_type,
            exam_date: format_date(sheet.exam_date),
            examiner: sheet.examiner,
            status: sheet.status,
        }
    }
}

fn default_status() -> SheetStatus {
    SheetStatus::Open
}
