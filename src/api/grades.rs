use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStaff;
use crate::api::validation::validate_payload;
use crate::core::{metrics, state::AppState};
use crate::schemas::grade::{GradeCreate, GradeResponse};
use crate::schemas::GroupSubjectQuery;
use crate::services::grades::{self, NewGrade};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_grades).post(record_grade))
}

async fn list_grades(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(params): Query<GroupSubjectQuery>,
) -> Result<Json<Vec<GradeResponse>>, ApiError> {
    validate_payload(&params)?;
    let grades = grades::list(state.db(), state.reference(), &params.group, &params.subject).await?;
    Ok(Json(grades.into_iter().map(GradeResponse::from).collect()))
}

async fn record_grade(
    State(state): State<AppState>,
    CurrentStaff(staff): CurrentStaff,
    Json(payload): Json<GradeCreate>,
) -> Result<(StatusCode, Json<GradeResponse>), ApiError> {
    validate_payload(&payload)?;

    let grade = grades::record_grade(
        state.db(),
        state.reference(),
        state.settings().grading(),
        NewGrade {
            student: &payload.student,
            group: &payload.group,
            subject: &payload.subject,
            type_of_work: &payload.type_of_work,
            grade: payload.grade,
            date: payload.date,
        },
    )
    .await?;

    metrics::record_action("grade_create", "ok");
    tracing::debug!(grade_id = grade.id, recorded_by = %staff.username, "Grade stored");
    Ok((StatusCode::CREATED, Json(GradeResponse::from(grade))))
}
