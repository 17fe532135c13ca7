use std::collections::HashMap;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use time::Date;
use validator::Validate;

use crate::core::time::parse_date;

pub(crate) mod auth;
pub(crate) mod exam_sheet;
pub(crate) mod grade;
pub(crate) mod reference;
pub(crate) mod report;
pub(crate) mod retake;
pub(crate) mod student;
pub(crate) mod user;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) api_prefix: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GroupSubjectQuery {
    #[validate(length(min = 1, message = "group must not be empty"))]
    pub(crate) group: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GroupQuery {
    #[validate(length(min = 1, message = "group must not be empty"))]
    pub(crate) group: String,
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
        .ok_or_else(|| D::Error::custom(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

pub(crate) fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date '{raw}', expected YYYY-MM-DD"))),
    }
}
