use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStaff;
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::schemas::retake::{RetakeCreate, RetakeResponse, RetakeStatusResponse};
use crate::schemas::GroupSubjectQuery;
use crate::services::retakes::{self, Enrollment};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_retakes).post(enroll))
        .route("/status", get(status))
        .route("/:retake_id", delete(remove))
}

async fn list_retakes(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(params): Query<GroupSubjectQuery>,
) -> Result<Json<Vec<RetakeResponse>>, ApiError> {
    validate_payload(&params)?;
    let retakes =
        retakes::list(state.db(), state.reference(), &params.group, &params.subject).await?;
    Ok(Json(retakes.into_iter().map(RetakeResponse::from).collect()))
}

async fn status(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(params): Query<GroupSubjectQuery>,
) -> Result<Json<RetakeStatusResponse>, ApiError> {
    validate_payload(&params)?;
    let current =
        retakes::status(state.db(), state.reference(), &params.group, &params.subject).await?;
    Ok(Json(RetakeStatusResponse::new(params.group, params.subject, current)))
}

async fn enroll(
    State(state): State<AppState>,
    CurrentStaff(staff): CurrentStaff,
    Json(payload): Json<RetakeCreate>,
) -> Result<(StatusCode, Json<RetakeResponse>), ApiError> {
    validate_payload(&payload)?;

    let retake = retakes::enroll(
        state.db(),
        state.reference(),
        Enrollment {
            group: &payload.group,
            subject: &payload.subject,
            student: &payload.student,
            reason: &payload.reason,
        },
        &staff,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(RetakeResponse::from(retake))))
}

async fn remove(
    State(state): State<AppState>,
    CurrentStaff(staff): CurrentStaff,
    Path(retake_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    retakes::remove(state.db(), retake_id, &staff).await?;
    Ok(StatusCode::NO_CONTENT)
}
