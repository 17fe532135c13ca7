use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::RecordsError;

/// Seconds a client should wait before retrying after a storage failure.
const RETRY_AFTER_SECONDS: &str = "2";

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }
}

impl From<RecordsError> for ApiError {
    fn from(err: RecordsError) -> Self {
        match err {
            RecordsError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid username or password")
            }
            RecordsError::DuplicateUser(_)
            | RecordsError::DuplicateStudent { .. }
            | RecordsError::StudentAlreadyLinked(_)
            | RecordsError::NoActiveSheet { .. } => ApiError::Conflict(err.to_string()),
            RecordsError::EmptySelection(_) | RecordsError::StudentNotInGroup { .. } => {
                ApiError::Unprocessable(err.to_string())
            }
            RecordsError::UnknownGroup(_)
            | RecordsError::UnknownSubject(_)
            | RecordsError::Validation(_) => ApiError::BadRequest(err.to_string()),
            RecordsError::NotFound(_) => ApiError::NotFound(err.to_string()),
            RecordsError::Persistence(source) => {
                tracing::error!(error = %source, "Storage operation failed");
                ApiError::ServiceUnavailable("Storage is temporarily unavailable".to_string())
            }
            RecordsError::Security(source) => {
                ApiError::internal(source, "Security operation failed")
            }
        }
    }
}

fn json_error(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorResponse { status: status.as_u16(), detail })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                let mut response = json_error(StatusCode::UNAUTHORIZED, message.to_string());
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            ApiError::Forbidden(message) => json_error(StatusCode::FORBIDDEN, message.to_string()),
            ApiError::BadRequest(message) => json_error(StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => json_error(StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => json_error(StatusCode::CONFLICT, message),
            ApiError::Unprocessable(message) => {
                json_error(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            ApiError::ServiceUnavailable(message) => {
                let mut response = json_error(StatusCode::SERVICE_UNAVAILABLE, message);
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECONDS));
                response
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}
