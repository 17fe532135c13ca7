use serde::Serialize;

use crate::schemas::grade::GradeResponse;
use crate::services::reporting::{PivotTable, RetakeLine, StudentCard, MISSING_CELL};

/// A pivot as sent over the wire. `values[i]` belongs to `columns[i]`;
/// a cell listed in `missing` holds `missing_value`, not a grade.
#[derive(Debug, Serialize)]
pub(crate) struct PivotResponse {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<PivotRowResponse>,
    pub(crate) missing_value: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PivotRowResponse {
    pub(crate) student: String,
    pub(crate) values: Vec<f64>,
    pub(crate) missing: Vec<String>,
}

impl From<PivotTable> for PivotResponse {
    fn from(table: PivotTable) -> Self {
        Self {
            columns: table.columns,
            rows: table
                .rows
                .into_iter()
                .map(|row| PivotRowResponse {
                    student: row.label,
                    values: row.cells,
                    missing: row.missing,
                })
                .collect(),
            missing_value: MISSING_CELL,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GradeSheetResponse {
    pub(crate) group: String,
    pub(crate) subject: String,
    #[serde(flatten)]
    pub(crate) table: PivotResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupSummaryResponse {
    pub(crate) group: String,
    #[serde(flatten)]
    pub(crate) table: PivotResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct RetakeLineResponse {
    pub(crate) id: i64,
    pub(crate) student: String,
    pub(crate) reason: String,
}

impl From<RetakeLine> for RetakeLineResponse {
    fn from(line: RetakeLine) -> Self {
        Self { id: line.id, student: line.student, reason: line.reason }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RetakeListResponse {
    pub(crate) group: String,
    pub(crate) subject: String,
    pub(crate) items: Vec<RetakeLineResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectGradesResponse {
    pub(crate) subject: String,
    pub(crate) average: f64,
    pub(crate) grades: Vec<GradeResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentCardResponse {
    pub(crate) student: String,
    pub(crate) groups: Vec<String>,
    pub(crate) subjects: Vec<SubjectGradesResponse>,
}

impl From<StudentCard> for StudentCardResponse {
    fn from(card: StudentCard) -> Self {
        Self {
            student: card.student,
            groups: card.groups,
            subjects: card
                .subjects
                .into_iter()
                .map(|subject| SubjectGradesResponse {
                    subject: subject.subject,
                    average: subject.average,
                    grades: subject.grades.into_iter().map(GradeResponse::from).collect(),
                })
                .collect(),
        }
    }
}
