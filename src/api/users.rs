use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::{validate_password_len, validate_payload};
use crate::core::state::AppState;
use crate::schemas::user::{AdminUserCreate, UserResponse};
use crate::services::credentials::{self, NewUser};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", post(create_user))
}

async fn create_user(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(payload): Json<AdminUserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_payload(&payload)?;
    validate_password_len(&payload.password)?;

    let user = credentials::create(
        state.db(),
        NewUser {
            username: &payload.username,
            password: &payload.password,
            role: payload.role,
            full_name: &payload.full_name,
            group_link: &payload.group_link,
            student_id: payload.student_id,
        },
    )
    .await?;

    tracing::info!(created_by = %admin.username, username = %user.username, "Admin created user");
    Ok((StatusCode::CREATED, Json(UserResponse::from_db(user))))
}

#[cfg(test)]
mod tests;
