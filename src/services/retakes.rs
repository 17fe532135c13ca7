//! Retake register workflow: enrollment is only possible while the
//! (group, subject) pair has an open exam sheet.

use sqlx::SqlitePool;

use crate::core::config::ReferenceData;
use crate::core::metrics;
use crate::core::time::today_utc;
use crate::db::models::{ExamSheet, Retake};
use crate::repositories;
use crate::services::session::Identity;
use crate::services::{ensure_pair, exam_sheets, required_text, RecordsError, RecordsResult};

#[derive(Debug, Clone)]
pub(crate) struct RetakeStatus {
    pub(crate) active_sheet: Option<ExamSheet>,
    /// Roster choices; empty when the group has no students.
    pub(crate) students: Vec<String>,
}

impl RetakeStatus {
    pub(crate) fn enrollment_open(&self) -> bool {
        self.active_sheet.is_some() && !self.students.is_empty()
    }
}

pub(crate) struct Enrollment<'a> {
    pub(crate) group: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) student: &'a str,
    pub(crate) reason: &'a str,
}

pub(crate) async fn status(
    pool: &SqlitePool,
    reference: &ReferenceData,
    group: &str,
    subject: &str,
) -> RecordsResult<RetakeStatus> {
    let active_sheet = exam_sheets::active(pool, reference, group, subject).await?;
    let students = repositories::students::list_by_group(pool, group)
        .await?
        .into_iter()
        .map(|student| student.full_name)
        .collect();

    Ok(RetakeStatus { active_sheet, students })
}

/// Inserts one retake entry attributed to `actor`, dated today.
pub(crate) async fn enroll(
    pool: &SqlitePool,
    reference: &ReferenceData,
    enrollment: Enrollment<'_>,
    actor: &Identity,
) -> RecordsResult<Retake> {
    let result = enroll_inner(pool, reference, &enrollment, actor).await;
    metrics::record_action("retake_enroll", if result.is_ok() { "ok" } else { "rejected" });

    match &result {
        Ok(retake) => tracing::info!(
            retake_id = retake.id,
            group = %retake.group_name,
            subject = %retake.subject,
            added_by = %actor.username,
            "Student enrolled for retake"
        ),
        Err(err) => tracing::warn!(
            group = %enrollment.group,
            subject = %enrollment.subject,
            added_by = %actor.username,
            error = %err,
            "Retake enrollment rejected"
        ),
    }
    result
}

async fn enroll_inner(
    pool: &SqlitePool,
    reference: &ReferenceData,
    enrollment: &Enrollment<'_>,
    actor: &Identity,
) -> RecordsResult<Retake> {
    let (group, subject) = (enrollment.group, enrollment.subject);
    ensure_pair(reference, group, subject)?;
    let student = required_text("student", enrollment.student)?;
    let reason = required_text("reason", enrollment.reason)?;

    let mut tx = pool.begin().await?;

    // Without an open sheet the roster is never consulted.
    if repositories::exam_sheets::find_active(&mut *tx, group, subject).await?.is_none() {
        return Err(RecordsError::NoActiveSheet {
            group: group.to_string(),
            subject: subject.to_string(),
        });
    }

    let roster = repositories::students::list_by_group(&mut *tx, group).await?;
    if roster.is_empty() {
        return Err(RecordsError::EmptySelection(group.to_string()));
    }
    if !roster.iter().any(|item| item.full_name == student) {
        return Err(RecordsError::StudentNotInGroup { group: group.to_string(), student });
    }

    let retake = repositories::retakes::create(
        &mut *tx,
        repositories::retakes::CreateRetake {
            student_name: &student,
            group_name: group,
            subject,
            reason: &reason,
            added_by: &actor.full_name,
            date_added: today_utc(),
        },
    )
    .await?;
    tx.commit().await?;

    Ok(retake)
}

pub(crate) async fn remove(pool: &SqlitePool, id: i64, actor: &Identity) -> RecordsResult<()> {
    if !repositories::retakes::delete_by_id(pool, id).await? {
        metrics::record_action("retake_remove", "not_found");
        return Err(RecordsError::NotFound(format!("Retake entry {id}")));
    }
    metrics::record_action("retake_remove", "ok");
    tracing::info!(retake_id = id, removed_by = %actor.username, "Retake entry removed");
    Ok(())
}

pub(crate) async fn list(
    pool: &SqlitePool,
    reference: &ReferenceData,
    group: &str,
    subject: &str,
) -> RecordsResult<Vec<Retake>> {
    ensure_pair(reference, group, subject)?;
    Ok(repositories::retakes::list_by_group_subject(pool, group, subject).await?)
}
