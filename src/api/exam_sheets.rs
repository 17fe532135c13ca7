use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentStaff};
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::schemas::exam_sheet::{ExamSheetCreate, ExamSheetResponse};
use crate::schemas::GroupSubjectQuery;
use crate::services::exam_sheets::{self, NewExamSheet};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_sheets).post(open_sheet))
}

async fn list_sheets(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(params): Query<GroupSubjectQuery>,
) -> Result<Json<Vec<ExamSheetResponse>>, ApiError> {
    validate_payload(&params)?;
    let sheets =
        exam_sheets::list(state.db(), state.reference(), &params.group, &params.subject).await?;
    Ok(Json(sheets.into_iter().map(ExamSheetResponse::from).collect()))
}

async fn open_sheet(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(payload): Json<ExamSheetCreate>,
) -> Result<(StatusCode, Json<ExamSheetResponse>), ApiError> {
    validate_payload(&payload)?;

    let sheet = exam_sheets::open_sheet(
        state.db(),
        state.reference(),
        NewExamSheet {
            sheet_number: &payload.sheet_number,
            group: &payload.group,
            subject: &payload.subject,
            control_type: &payload.control_type,
            exam_date: payload.exam_date,
            examiner: &payload.examiner,
            status: payload.status,
        },
    )
    .await?;

    tracing::debug!(sheet_id = sheet.id, opened_by = %admin.username, "Exam sheet stored");
    Ok((StatusCode::CREATED, Json(ExamSheetResponse::from(sheet))))
}
