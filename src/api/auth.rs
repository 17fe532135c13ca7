use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentSession, CurrentUser, MaybeSession};
use crate::api::validation::{validate_password_len, validate_payload};
use crate::core::{metrics, security, state::AppState};
use crate::db::types::UserRole;
use crate::schemas::auth::{
    IdentityResponse, LoginRequest, RegisterRequest, SessionResponse, ThemeUpdate,
};
use crate::services::credentials::{self, NewUser};
use crate::services::session::{self, SessionContext};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/session", post(start_session).get(current_session))
        .route("/session/theme", put(set_theme))
        .route("/session/theme/toggle", post(toggle_theme))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Runs before every new session id is handed out.
async fn prune_sessions(state: &AppState) -> Result<(), ApiError> {
    session::prune_expired(state.db(), state.settings().security().token_lifetime()).await?;
    Ok(())
}

fn issue_token(state: &AppState, ctx: &SessionContext) -> Result<String, ApiError> {
    security::create_session_token(&ctx.id, state.settings().security(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create session token"))
}

async fn start_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    prune_sessions(&state).await?;
    let ctx = session::start(state.db(), Default::default()).await?;
    let token = issue_token(&state, &ctx)?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from_context(&ctx, Some(token)))))
}

async fn current_session(CurrentSession(ctx): CurrentSession) -> Json<SessionResponse> {
    Json(SessionResponse::from_context(&ctx, None))
}

async fn set_theme(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Json(payload): Json<ThemeUpdate>,
) -> Result<Json<SessionResponse>, ApiError> {
    let ctx = session::set_theme(state.db(), ctx, payload.theme).await?;
    Ok(Json(SessionResponse::from_context(&ctx, None)))
}

async fn toggle_theme(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> Result<Json<SessionResponse>, ApiError> {
    let ctx = session::toggle_theme(state.db(), ctx).await?;
    Ok(Json(SessionResponse::from_context(&ctx, None)))
}

/// Self-service accounts always get the student role.
async fn register(
    State(state): State<AppState>,
    MaybeSession(current): MaybeSession,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    validate_payload(&payload)?;
    validate_password_len(&payload.password)?;

    credentials::create(
        state.db(),
        NewUser {
            username: &payload.username,
            password: &payload.password,
            role: UserRole::Student,
            full_name: &payload.full_name,
            group_link: &payload.group_link,
            student_id: None,
        },
    )
    .await?;

    prune_sessions(&state).await?;
    let ctx =
        session::login(state.db(), current.as_ref(), &payload.username, &payload.password).await?;
    let token = issue_token(&state, &ctx)?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from_context(&ctx, Some(token)))))
}

async fn login(
    State(state): State<AppState>,
    MaybeSession(current): MaybeSession,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    validate_payload(&payload)?;
    prune_sessions(&state).await?;

    let result =
        session::login(state.db(), current.as_ref(), &payload.username, &payload.password).await;
    metrics::record_action("login", if result.is_ok() { "ok" } else { "rejected" });

    let ctx = result.inspect_err(|_| {
        tracing::info!(username = %payload.username, "Login rejected");
    })?;
    let token = issue_token(&state, &ctx)?;
    Ok(Json(SessionResponse::from_context(&ctx, Some(token))))
}

async fn logout(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> Result<Json<SessionResponse>, ApiError> {
    let ctx = session::logout(state.db(), ctx).await?;
    Ok(Json(SessionResponse::from_context(&ctx, None)))
}

async fn me(CurrentUser(identity): CurrentUser) -> Json<IdentityResponse> {
    Json(IdentityResponse::from(&identity))
}

#[cfg(test)]
mod tests;
