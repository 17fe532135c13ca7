//! Read-only views over the grade ledger and the retake register.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::SqlitePool;

use crate::core::config::ReferenceData;
use crate::db::models::Grade;
use crate::repositories;
use crate::services::{ensure_group, ensure_pair, required_text, RecordsError, RecordsResult};

/// Value written into cells that have no grade. Check [`PivotRow::missing`]
/// before reading a `0.0` as an actual zero.
pub(crate) const MISSING_CELL: f64 = 0.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PivotTable {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<PivotRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PivotRow {
    pub(crate) label: String,
    /// Aligned with [`PivotTable::columns`].
    pub(crate) cells: Vec<f64>,
    pub(crate) missing: Vec<String>,
}

impl PivotTable {
    pub(crate) fn cell(&self, row: &str, column: &str) -> Option<f64> {
        let column_index = self.columns.iter().position(|item| item == column)?;
        let row = self.rows.iter().find(|item| item.label == row)?;
        row.cells.get(column_index).copied()
    }
}

/// Widened accumulator: any configured grade scale sums without overflow.
#[derive(Default)]
struct Mean {
    sum: i128,
    count: u64,
}

impl Mean {
    fn push(&mut self, value: i64) {
        self.sum = self.sum.saturating_add(i128::from(value));
        self.count = self.count.saturating_add(1);
    }

    fn value(&self) -> f64 {
        self.sum as f64 / self.count.max(1) as f64
    }
}

/// Pivots `(row, column, grade)` triples. Repeated grades in one cell are
/// averaged; rows and columns come out sorted.
pub(crate) fn pivot<'a, I>(entries: I) -> PivotTable
where
    I: IntoIterator<Item = (&'a str, &'a str, i64)>,
{
    let mut columns = BTreeSet::new();
    let mut cells: BTreeMap<&str, BTreeMap<&str, Mean>> = BTreeMap::new();

    for (row, column, grade) in entries {
        columns.insert(column);
        cells.entry(row).or_default().entry(column).or_default().push(grade);
    }

    let rows = cells
        .into_iter()
        .map(|(label, by_column)| {
            let mut missing = Vec::new();
            let values = columns
                .iter()
                .map(|column| match by_column.get(column) {
                    Some(mean) => mean.value(),
                    None => {
                        missing.push(column.to_string());
                        MISSING_CELL
                    }
                })
                .collect();
            PivotRow { label: label.to_string(), cells: values, missing }
        })
        .collect();

    PivotTable { columns: columns.into_iter().map(str::to_string).collect(), rows }
}

/// Student × type-of-work table for one group and subject.
pub(crate) async fn grade_sheet(
    pool: &SqlitePool,
    reference: &ReferenceData,
    group: &str,
    subject: &str,
) -> RecordsResult<PivotTable> {
    ensure_pair(reference, group, subject)?;
    let grades = repositories::grades::list_by_group_subject(pool, group, subject).await?;
    Ok(pivot(grades.iter().map(|grade| {
        (grade.student_name.as_str(), grade.type_of_work.as_str(), grade.grade)
    })))
}

/// Student × subject table of mean grades for one group.
pub(crate) async fn group_summary(
    pool: &SqlitePool,
    reference: &ReferenceData,
    group: &str,
) -> RecordsResult<PivotTable> {
    ensure_group(reference, group)?;
    let grades = repositories::grades::list_by_group(pool, group).await?;
    Ok(pivot(
        grades
            .iter()
            .map(|grade| (grade.student_name.as_str(), grade.subject.as_str(), grade.grade)),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RetakeLine {
    pub(crate) id: i64,
    pub(crate) student: String,
    pub(crate) reason: String,
}

/// Insertion order; `id` is the key for deletion.
pub(crate) async fn retake_list(
    pool: &SqlitePool,
    reference: &ReferenceData,
    group: &str,
    subject: &str,
) -> RecordsResult<Vec<RetakeLine>> {
    ensure_pair(reference, group, subject)?;
    let retakes = repositories::retakes::list_by_group_subject(pool, group, subject).await?;
    Ok(retakes
        .into_iter()
        .map(|retake| RetakeLine {
            id: retake.id,
            student: retake.student_name,
            reason: retake.reason,
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StudentCard {
    pub(crate) student: String,
    pub(crate) groups: Vec<String>,
    pub(crate) subjects: Vec<SubjectGrades>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SubjectGrades {
    pub(crate) subject: String,
    pub(crate) average: f64,
    pub(crate) grades: Vec<Grade>,
}

pub(crate) async fn student_card(pool: &SqlitePool, student: &str) -> RecordsResult<StudentCard> {
    let student = required_text("student", student)?;
    let groups = repositories::students::groups_of(pool, &student).await?;
    let grades = repositories::grades::list_by_student(pool, &student).await?;

    if groups.is_empty() && grades.is_empty() {
        return Err(RecordsError::NotFound(format!("Student '{student}'")));
    }

    let mut by_subject: BTreeMap<String, Vec<Grade>> = BTreeMap::new();
    for grade in grades {
        by_subject.entry(grade.subject.clone()).or_default().push(grade);
    }

    let subjects = by_subject
        .into_iter()
        .map(|(subject, grades)| {
            let mut mean = Mean::default();
            grades.iter().for_each(|grade| mean.push(grade.grade));
            SubjectGrades { subject, average: mean.value(), grades }
        })
        .collect();

    Ok(StudentCard { student, groups, subjects })
}
