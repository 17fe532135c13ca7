//! Domain operations over the stores in [`crate::repositories`].
//!
//! Handlers call into these modules and translate [`RecordsError`] into HTTP
//! responses; nothing here knows about axum.

pub(crate) mod credentials;
pub(crate) mod exam_sheets;
pub(crate) mod grades;
pub(crate) mod reporting;
pub(crate) mod retakes;
pub(crate) mod roster;
pub(crate) mod session;

use thiserror::Error;

use crate::core::config::ReferenceData;
use crate::core::security::SecurityError;

#[derive(Debug, Error)]
pub(crate) enum RecordsError {
    /// Unknown user and wrong password are deliberately indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("User '{0}' already exists")]
    DuplicateUser(String),
    #[error("Student '{student}' is already on the roster of group {group}")]
    DuplicateStudent { group: String, student: String },
    #[error("Roster entry {0} is already linked to another account")]
    StudentAlreadyLinked(i64),
    #[error("Group {0} has no students to choose from")]
    EmptySelection(String),
    #[error("No open exam sheet for group {group} and subject '{subject}'")]
    NoActiveSheet { group: String, subject: String },
    #[error("Student '{student}' is not on the roster of group {group}")]
    StudentNotInGroup { group: String, student: String },
    #[error("Unknown group: {0}")]
    UnknownGroup(String),
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("database operation failed: {0}")]
    Persistence(#[from] sqlx::Error),
    #[error(transparent)]
    Security(#[from] SecurityError),
}

pub(crate) type RecordsResult<T> = Result<T, RecordsError>;

pub(crate) fn ensure_group(reference: &ReferenceData, group: &str) -> RecordsResult<()> {
    if reference.has_group(group) {
        Ok(())
    } else {
        Err(RecordsError::UnknownGroup(group.to_string()))
    }
}

pub(crate) fn ensure_subject(reference: &ReferenceData, subject: &str) -> RecordsResult<()> {
    if reference.has_subject(subject) {
        Ok(())
    } else {
        Err(RecordsError::UnknownSubject(subject.to_string()))
    }
}

pub(crate) fn ensure_pair(
    reference: &ReferenceData,
    group: &str,
    subject: &str,
) -> RecordsResult<()> {
    ensure_group(reference, group)?;
    ensure_subject(reference, subject)
}

/// Trims `value` and rejects it when blank.
pub(crate) fn required_text(field: &str, value: &str) -> RecordsResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordsError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
