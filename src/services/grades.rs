use sqlx::SqlitePool;
use time::Date;

use crate::core::config::{GradingSettings, ReferenceData};
use crate::core::time::today_utc;
use crate::db::models::Grade;
use crate::repositories;
use crate::services::{ensure_pair, required_text, RecordsError, RecordsResult};

pub(crate) struct NewGrade<'a> {
    pub(crate) student: &'a str,
    pub(crate) group: &'a str,
    pub(crate) subject: &'a str,
    pub(crate) type_of_work: &'a str,
    pub(crate) grade: i64,
    /// Defaults to today.
    pub(crate) date: Option<Date>,
}

/// Appends one grade. Earlier grades for the same work are kept.
pub(crate) async fn record_grade(
    pool: &SqlitePool,
    reference: &ReferenceData,
    grading: &GradingSettings,
    new_grade: NewGrade<'_>,
) -> RecordsResult<Grade> {
    ensure_pair(reference, new_grade.group, new_grade.subject)?;
    let student = required_text("student", new_grade.student)?;
    let type_of_work = required_text("type_of_work", new_grade.type_of_work)?;

    if !grading.contains(new_grade.grade) {
        return Err(RecordsError::Validation(format!(
            "grade must be between {} and {}",
            grading.min_grade, grading.max_grade
        )));
    }

    if !repositories::students::exists_in_group(pool, new_grade.group, &student).await? {
        return Err(RecordsError::StudentNotInGroup {
            group: new_grade.group.to_string(),
            student,
        });
    }

    let grade = repositories::grades::create(
        pool,
        repositories::grades::CreateGrade {
            student_name: &student,
            group_name: new_grade.group,
            subject: new_grade.subject,
            type_of_work: &type_of_work,
            grade: new_grade.grade,
            date: new_grade.date.unwrap_or_else(today_utc),
        },
    )
    .await?;

    tracing::info!(
        grade_id = grade.id,
        group = %grade.group_name,
        subject = %grade.subject,
        type_of_work = %grade.type_of_work,
        "Grade recorded"
    );
    Ok(grade)
}

pub(crate) async fn list(
    pool: &SqlitePool,
    reference: &ReferenceData,
    group: &str,
    subject: &str,
) -> RecordsResult<Vec<Grade>> {
    ensure_pair(reference, group, subject)?;
    Ok(repositories::grades::list_by_group_subject(pool, group, subject).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::roster;
    use crate::test_support;
    use time::Month;

    const ANNA: &str = "Алексєєнко Анна Олександрівна";

    fn grading() -> GradingSettings {
        GradingSettings { min_grade: 0, max_grade: 100 }
    }

    fn grade(value: i64, date: Option<Date>) -> NewGrade<'static> {
        NewGrade {
            student: ANNA,
            group: "1СОМ",
            subject: "Фізика",
            type_of_work: "lab",
            grade: value,
            date,
        }
    }

    async fn seeded_pool() -> SqlitePool {
        let pool = test_support::test_pool().await;
        roster::seed_rosters(&pool, &ReferenceData::default()).await.expect("seed");
        pool
    }

    #[tokio::test]
    async fn repeated_grades_are_all_kept() {
        let pool = seeded_pool().await;
        let reference = ReferenceData::default();
        let date = Date::from_calendar_date(2025, Month::May, 20).unwrap();

        record_grade(&pool, &reference, &grading(), grade(60, Some(date))).await.unwrap();
        record_grade(&pool, &reference, &grading(), grade(90, Some(date))).await.unwrap();

        let grades = list(&pool, &reference, "1СОМ", "Фізика").await.unwrap();
        assert_eq!(grades.iter().map(|item| item.grade).collect::<Vec<_>>(), vec![60, 90]);
        assert!(grades.iter().all(|item| item.date == date));
    }

    #[tokio::test]
    async fn date_defaults_to_today() {
        let pool = seeded_pool().await;
        let stored = record_grade(&pool, &ReferenceData::default(), &grading(), grade(75, None))
            .await
            .unwrap();
        assert_eq!(stored.date, today_utc());
    }

    #[tokio::test]
    async fn out_of_scale_and_unknown_students_are_rejected() {
        let pool = seeded_pool().await;
        let reference = ReferenceData::default();

        assert!(matches!(
            record_grade(&pool, &reference, &grading(), grade(101, None)).await,
            Err(RecordsError::Validation(_))
        ));

        let mut stranger = grade(50, None);
        stranger.student = "Лисенко Тимофій Сергійович";
        assert!(matches!(
            record_grade(&pool, &reference, &grading(), stranger).await,
            Err(RecordsError::StudentNotInGroup { .. })
        ));

        assert!(list(&pool, &reference, "1СОМ", "Фізика").await.unwrap().is_empty());
    }
}
