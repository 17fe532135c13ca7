use axum::{extract::State, routing::get, Json, Router};

use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::schemas::reference::{GroupsResponse, SubjectsResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/groups", get(groups)).route("/subjects", get(subjects))
}

async fn groups(State(state): State<AppState>, _user: CurrentUser) -> Json<GroupsResponse> {
    Json(GroupsResponse::from_reference(state.reference()))
}

async fn subjects(State(state): State<AppState>, _user: CurrentUser) -> Json<SubjectsResponse> {
    Json(SubjectsResponse::from_reference(state.reference()))
}
