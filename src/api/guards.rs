use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::types::UserRole;
use crate::services::session::{self, Identity, SessionContext};

/// A session addressed by a valid bearer token; may be anonymous.
pub(crate) struct CurrentSession(pub(crate) SessionContext);

/// Like [`CurrentSession`], but absent or stale tokens yield `None`.
pub(crate) struct MaybeSession(pub(crate) Option<SessionContext>);

pub(crate) struct CurrentUser(pub(crate) Identity);
pub(crate) struct CurrentStaff(pub(crate) Identity);
pub(crate) struct CurrentAdmin(pub(crate) Identity);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn app_state(parts: &mut Parts, state: &AppState) -> Result<AppState, ApiError> {
    let State(app_state) = State::<AppState>::from_request_parts(parts, state)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;
    Ok(app_state)
}

async fn resolve_session(
    app_state: &AppState,
    token: &str,
) -> Result<Option<SessionContext>, ApiError> {
    let Ok(claims) = security::verify_session_token(token, app_state.settings().security()) else {
        return Ok(None);
    };
    Ok(session::load(app_state.db(), &claims.sub).await?)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let app_state = app_state(parts, state).await?;
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized("Session token required"))?;

        resolve_session(&app_state, token)
            .await?
            .map(CurrentSession)
            .ok_or(ApiError::Unauthorized("Invalid or expired session"))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let app_state = app_state(parts, state).await?;
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeSession(None));
        };
        Ok(MaybeSession(resolve_session(&app_state, token).await?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentSession(ctx) = CurrentSession::from_request_parts(parts, state).await?;

        match ctx.identity() {
            Some(identity) => Ok(CurrentUser(identity.clone())),
            None => Err(ApiError::Unauthorized("Not authenticated")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStaff {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;
        require_role(&identity, UserRole::STAFF)?;
        Ok(CurrentStaff(identity))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;
        require_role(&identity, UserRole::ADMIN_ONLY)?;
        Ok(CurrentAdmin(identity))
    }
}

pub(crate) fn require_role(identity: &Identity, allowed: &[UserRole]) -> Result<(), ApiError> {
    if identity.has_role(allowed) {
        return Ok(());
    }

    tracing::warn!(
        username = %identity.username,
        role = identity.role.as_str(),
        "Role gate denied access"
    );
    Err(ApiError::Forbidden("Not enough permissions"))
}
