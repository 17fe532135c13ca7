use sqlx::SqlitePool;
use time::Date;

use crate::core::config::ReferenceData;
use crate::db::models::ExamSheet;
use crate::db::types::SheetStatus;
use crate::repositories;
use crate::services::{ensure_pair, required_text, RecordsResult};

pub(crate) struct NewExamSheet<'a> {
    pub(crate) sheet_number: &'a str,
    pub(crate) group: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) control_type: &'a str,
    pub(crate) exam_date: Date,
    pub(crate) examiner: &'a str,
    pub(crate) status: SheetStatus,
}

/// Records a sheet. Only sheets created with status `open` make the
/// (group, subject) pair eligible for retake enrollment.
pub(crate) async fn open_sheet(
    pool: &SqlitePool,
    reference: &ReferenceData,
    sheet: NewExamSheet<'_>,
) -> RecordsResult<ExamSheet> {
    ensure_pair(reference, sheet.group, sheet.subject)?;
    let sheet_number = required_text("sheet_number", sheet.sheet_number)?;
    let control_type = required_text("control_type", sheet.control_type)?;
    let examiner = required_text("examiner", sheet.examiner)?;

    let created = repositories::exam_sheets::create(
        pool,
        repositories::exam_sheets::CreateExamSheet {
            sheet_number: &sheet_number,
            group_name: sheet.group,
            subject: sheet.subject,
            control_type: &control_type,
            exam_date: sheet.exam_date,
            examiner: &examiner,
            status: sheet.status,
        },
    )
    .await?;

    tracing::info!(
        sheet_id = created.id,
        sheet_number = %created.sheet_number,
        group = %created.group_name,
        subject = %created.subject,
        status = ?created.status,
        "Exam sheet recorded"
    );
    Ok(created)
}

pub(crate) async fn list(
    pool: &SqlitePool,
    reference: &ReferenceData,
    group: &str,
    subject: &str,
) -> RecordsResult<Vec<ExamSheet>> {
    ensure_pair(reference, group, subject)?;
    Ok(repositories::exam_sheets::list_by_group_subject(pool, group, subject).await?)
}

pub(crate) async fn active(
    pool: &SqlitePool,
    reference: &ReferenceData,
    group: &str,
    subject: &str,
) -> RecordsResult<Option<ExamSheet>> {
    ensure_pair(reference, group, subject)?;
    Ok(repositories::exam_sheets::find_active(pool, group, subject).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::RecordsError;
    use crate::test_support;
    use time::Month;

    fn sheet(number: &'static str, status: SheetStatus) -> NewExamSheet<'static> {
        NewExamSheet {
            sheet_number: number,
            group: "1СОМ",
            subject: "Фізика",
            control_type: "екзамен",
            exam_date: Date::from_calendar_date(2025, Month::June, 12).unwrap(),
            examiner: "Коваленко І. П.",
            status,
        }
    }

    #[tokio::test]
    async fn newest_open_sheet_is_active() {
        let pool = test_support::test_pool().await;
        let reference = ReferenceData::default();

        assert!(active(&pool, &reference, "1СОМ", "Фізика").await.unwrap().is_none());

        open_sheet(&pool, &reference, sheet("В-1", SheetStatus::Open)).await.unwrap();
        let second = open_sheet(&pool, &reference, sheet("В-2", SheetStatus::Open)).await.unwrap();
        open_sheet(&pool, &reference, sheet("В-3", SheetStatus::Closed)).await.unwrap();

        let current = active(&pool, &reference, "1СОМ", "Фізика").await.unwrap().expect("active");
        assert_eq!(current.id, second.id);
        assert_eq!(list(&pool, &reference, "1СОМ", "Фізика").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn closed_sheet_alone_is_not_active() {
        let pool = test_support::test_pool().await;
        let reference = ReferenceData::default();
        open_sheet(&pool, &reference, sheet("В-9", SheetStatus::Closed)).await.unwrap();
        assert!(active(&pool, &reference, "1СОМ", "Фізика").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sheet_for_other_pair_does_not_leak() {
        let pool = test_support::test_pool().await;
        let reference = ReferenceData::default();
        open_sheet(&pool, &reference, sheet("В-1", SheetStatus::Open)).await.unwrap();
        assert!(active(&pool, &reference, "1СОІ", "Фізика").await.unwrap().is_none());
        assert!(active(&pool, &reference, "1СОМ", "Філософія").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_subject_is_rejected() {
        let pool = test_support::test_pool().await;
        let mut bad = sheet("В-1", SheetStatus::Open);
        bad.subject = "Хімія";
        assert!(matches!(
            open_sheet(&pool, &ReferenceData::default(), bad).await,
            Err(RecordsError::UnknownSubject(_))
        ));
    }
}
