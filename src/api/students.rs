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
use crate::schemas::student::{StudentCreate, StudentResponse};
use crate::schemas::GroupQuery;
use crate::services::roster;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_students).post(add_student))
}

async fn list_students(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(params): Query<GroupQuery>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    validate_payload(&params)?;
    let students = roster::list(state.db(), state.reference(), &params.group).await?;
    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}

async fn add_student(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Json(payload): Json<StudentCreate>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    validate_payload(&payload)?;
    let student =
        roster::add_student(state.db(), state.reference(), &payload.group, &payload.full_name)
            .await?;
    Ok((StatusCode::CREATED, Json(StudentResponse::from(student))))
}
