use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::User;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AdminUserCreate {
    #[validate(length(min = 3, max = 64, message = "username must be 3-64 characters long"))]
    pub(crate) username: String,
    pub(crate) password: String,
    #[serde(default = "default_user_role")]
    pub(crate) role: UserRole,
    #[serde(alias = "fullName")]
    #[validate(length(min = 1, max = 200, message = "full_name must be 1-200 characters long"))]
    pub(crate) full_name: String,
    #[serde(default)]
    #[serde(alias = "groupLink")]
    pub(crate) group_link: String,
    #[serde(default, alias = "studentId")]
    pub(crate) student_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) username: String,
    pub(crate) role: UserRole,
    pub(crate) full_name: String,
    pub(crate) group_link: String,
    pub(crate) student_id: Option<i64>,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            username: user.username,
            role: user.role,
            full_name: user.full_name,
            group_link: user.group_link,
            student_id: user.student_id,
            created_at: format_primitive(user.created_at),
        }
    }
}

fn default_user_role() -> UserRole {
    UserRole::Student
}
