//! Explicit session context: anonymous or authenticated, plus a theme
//! preference that survives login and logout.

use sqlx::SqlitePool;
use time::{Duration, PrimitiveDateTime};
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{SessionRow, User};
use crate::db::types::{Theme, UserRole};
use crate::repositories;
use crate::services::{credentials, RecordsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) username: String,
    pub(crate) role: UserRole,
    pub(crate) full_name: String,
}

impl Identity {
    pub(crate) fn has_role(&self, allowed: &[UserRole]) -> bool {
        allowed.contains(&self.role)
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
            full_name: user.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionState {
    Anonymous,
    Authenticated(Identity),
}

#[derive(Debug, Clone)]
pub(crate) struct SessionContext {
    pub(crate) id: String,
    pub(crate) state: SessionState,
    pub(crate) theme: Theme,
    created_at: PrimitiveDateTime,
}

impl SessionContext {
    fn from_row(row: SessionRow) -> Self {
        let state = match (row.username, row.role, row.full_name) {
            (Some(username), Some(role), Some(full_name)) => {
                SessionState::Authenticated(Identity { username, role, full_name })
            }
            _ => SessionState::Anonymous,
        };
        Self { id: row.id, state, theme: row.theme, created_at: row.created_at }
    }

    fn to_row(&self, updated_at: PrimitiveDateTime) -> SessionRow {
        let identity = self.identity();
        SessionRow {
            id: self.id.clone(),
            username: identity.map(|item| item.username.clone()),
            role: identity.map(|item| item.role),
            full_name: identity.map(|item| item.full_name.clone()),
            theme: self.theme,
            created_at: self.created_at,
            updated_at,
        }
    }

    pub(crate) fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::Anonymous => None,
        }
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    pub(crate) fn authenticate(&mut self, user: &User) {
        self.state = SessionState::Authenticated(Identity::from(user));
    }

    /// Drops every identity field; the theme stays.
    pub(crate) fn clear_identity(&mut self) {
        self.state = SessionState::Anonymous;
    }
}

pub(crate) async fn start(pool: &SqlitePool, theme: Theme) -> RecordsResult<SessionContext> {
    let id = Uuid::new_v4().to_string();
    let row = repositories::sessions::create_anonymous(pool, &id, theme, primitive_now_utc()).await?;
    Ok(SessionContext::from_row(row))
}

/// Drops sessions older than `lifetime`. A token is only issued together with
/// a new session id, so such rows are unreachable.
pub(crate) async fn prune_expired(pool: &SqlitePool, lifetime: Duration) -> RecordsResult<u64> {
    let Some(cutoff) = primitive_now_utc().checked_sub(lifetime) else {
        return Ok(0);
    };
    let removed = repositories::sessions::delete_created_before(pool, cutoff).await?;
    if removed > 0 {
        tracing::debug!(removed, "Pruned expired sessions");
    }
    Ok(removed)
}

pub(crate) async fn load(pool: &SqlitePool, id: &str) -> RecordsResult<Option<SessionContext>> {
    let row = repositories::sessions::find_by_id(pool, id).await?;
    Ok(row.map(SessionContext::from_row))
}

/// Verifies credentials and returns an authenticated session under a fresh
/// id. The theme of `current` carries over and its row is removed.
pub(crate) async fn login(
    pool: &SqlitePool,
    current: Option<&SessionContext>,
    username: &str,
    password: &str,
) -> RecordsResult<SessionContext> {
    let user = credentials::authenticate(pool, username, password).await?;
    let theme = current.map(|ctx| ctx.theme).unwrap_or_default();

    let now = primitive_now_utc();
    let id = Uuid::new_v4().to_string();

    let mut tx = pool.begin().await?;
    if let Some(previous) = current {
        repositories::sessions::delete(&mut *tx, &previous.id).await?;
    }
    let row = repositories::sessions::create_anonymous(&mut *tx, &id, theme, now).await?;
    let mut ctx = SessionContext::from_row(row);
    ctx.authenticate(&user);
    repositories::sessions::save(&mut *tx, &ctx.to_row(now)).await?;
    tx.commit().await?;

    tracing::info!(
        username = %user.username,
        role = user.role.as_str(),
        session_id = %ctx.id,
        "User logged in"
    );
    Ok(ctx)
}

pub(crate) async fn logout(
    pool: &SqlitePool,
    mut ctx: SessionContext,
) -> RecordsResult<SessionContext> {
    if let Some(identity) = ctx.identity() {
        tracing::info!(username = %identity.username, session_id = %ctx.id, "User logged out");
    }
    ctx.clear_identity();
    repositories::sessions::save(pool, &ctx.to_row(primitive_now_utc())).await?;
    Ok(ctx)
}

pub(crate) async fn set_theme(
    pool: &SqlitePool,
    mut ctx: SessionContext,
    theme: Theme,
) -> RecordsResult<SessionContext> {
    ctx.theme = theme;
    repositories::sessions::save(pool, &ctx.to_row(primitive_now_utc())).await?;
    Ok(ctx)
}

pub(crate) async fn toggle_theme(
    pool: &SqlitePool,
    ctx: SessionContext,
) -> RecordsResult<SessionContext> {
    let theme = ctx.theme.toggled();
    set_theme(pool, ctx, theme).await
}
