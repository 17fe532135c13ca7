use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_role, CurrentStaff, CurrentUser};
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::schemas::report::{
    GradeSheetResponse, GroupSummaryResponse, RetakeLineResponse, RetakeListResponse,
    StudentCardResponse,
};
use crate::schemas::{GroupQuery, GroupSubjectQuery};
use crate::services::{reporting, roster};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentQuery {
    #[validate(length(min = 1, message = "student must not be empty"))]
    student: String,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/grade-sheet", get(grade_sheet))
        .route("/retakes", get(retake_list))
        .route("/student-card", get(student_card))
        .route("/group-summary", get(group_summary))
}

async fn grade_sheet(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(params): Query<GroupSubjectQuery>,
) -> Result<Json<GradeSheetResponse>, ApiError> {
    validate_payload(&params)?;
    let table =
        reporting::grade_sheet(state.db(), state.reference(), &params.group, &params.subject)
            .await?;
    Ok(Json(GradeSheetResponse {
        group: params.group,
        subject: params.subject,
        table: table.into(),
    }))
}

async fn retake_list(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(params): Query<GroupSubjectQuery>,
) -> Result<Json<RetakeListResponse>, ApiError> {
    validate_payload(&params)?;
    let lines =
        reporting::retake_list(state.db(), state.reference(), &params.group, &params.subject)
            .await?;
    Ok(Json(RetakeListResponse {
        group: params.group,
        subject: params.subject,
        items: lines.into_iter().map(RetakeLineResponse::from).collect(),
    }))
}

/// Staff may read any card; a student only the card of the roster entry an
/// administrator linked to their account.
async fn student_card(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Query(params): Query<StudentQuery>,
) -> Result<Json<StudentCardResponse>, ApiError> {
    validate_payload(&params)?;
    if !identity.has_role(UserRole::STAFF) {
        let linked = roster::linked_student(state.db(), &identity.username).await?;
        let own_card =
            linked.is_some_and(|student| student.full_name == params.student.trim());
        if !own_card {
            require_role(&identity, UserRole::STAFF)?;
        }
    }

    let card = reporting::student_card(state.db(), &params.student).await?;
    Ok(Json(card.into()))
}

async fn group_summary(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(params): Query<GroupQuery>,
) -> Result<Json<GroupSummaryResponse>, ApiError> {
    validate_payload(&params)?;
    let table = reporting::group_summary(state.db(), state.reference(), &params.group).await?;
    Ok(Json(GroupSummaryResponse { group: params.group, table: table.into() }))
}
