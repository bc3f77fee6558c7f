//! API Middleware
//!
//! Session authentication extractor for Axum.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::api::users::UsersState;
use crate::domain::UserAccount;
use crate::error::DocketError;

/// Header carrying the session token, both on requests and on login responses
pub const AUTH_HEADER: &str = "x-auth";

/// Extractor for requests bearing a live session token
pub struct AuthenticatedUser {
    pub account: UserAccount,
    pub token: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    UsersState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = DocketError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DocketError::token("missing x-auth header"))?
            .to_string();

        let state = UsersState::from_ref(state);
        let account = state
            .user_service
            .find_by_token(&token)
            .await
            .map_err(|e| match e {
                DocketError::NotFound { .. } => DocketError::token("no live session for token"),
                other => other,
            })?;

        Ok(Self { account, token })
    }
}
