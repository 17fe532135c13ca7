use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::types::{Theme, UserRole};
use crate::services::session::{Identity, SessionContext};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginRequest {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub(crate) username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "username must be 3-64 characters long"))]
    pub(crate) username: String,
    pub(crate) password: String,
    #[serde(alias = "fullName")]
    #[validate(length(min = 1, max = 200, message = "full_name must be 1-200 characters long"))]
    pub(crate) full_name: String,
    #[serde(default)]
    #[serde(alias = "groupLink")]
    pub(crate) group_link: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThemeUpdate {
    pub(crate) theme: Theme,
}

#[derive(Debug, Serialize)]
pub(crate) struct IdentityResponse {
    pub(crate) username: String,
    pub(crate) role: UserRole,
    pub(crate) full_name: String,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            username: identity.username.clone(),
            role: identity.role,
            full_name: identity.full_name.clone(),
        }
    }
}

/// `access_token` is only present when a new session id was issued.
#[derive(Debug, Serialize)]
pub(crate) struct SessionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) token_type: Option<&'static str>,
    pub(crate) authenticated: bool,
    pub(crate) theme: Theme,
    pub(crate) user: Option<IdentityResponse>,
}

impl SessionResponse {
    pub(crate) fn from_context(ctx: &SessionContext, access_token: Option<String>) -> Self {
        let token_type = access_token.as_ref().map(|_| "bearer");
        Self {
            access_token,
            token_type,
            authenticated: ctx.is_authenticated(),
            theme: ctx.theme,
            user: ctx.identity().map(IdentityResponse::from),
        }
    }
}
