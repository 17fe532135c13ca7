use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::Student;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentCreate {
    #[validate(length(min = 1, message = "group must not be empty"))]
    pub(crate) group: String,
    #[serde(alias = "fullName")]
    #[validate(length(min = 1, max = 200, message = "full_name must be 1-200 characters long"))]
    pub(crate) full_name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: i64,
    pub(crate) full_name: String,
    pub(crate) group: String,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self { id: student.id, full_name: student.full_name, group: student.group_name }
    }
}
