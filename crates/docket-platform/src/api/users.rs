//! Users API
//!
//! - POST /users - Register and open a session
//! - POST /users/login - Email/password login
//! - GET /users/me - Account behind the presented token
//! - DELETE /users/me/token - Logout (drop the presented token)

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::ApiResult;
use crate::api::middleware::{AuthenticatedUser, AUTH_HEADER};
use crate::domain::PublicUser;
use crate::error::DocketError;
use crate::service::UserService;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct UsersState {
    pub user_service: UserService,
}

/// Register a new account; the first session token comes back in `x-auth`
pub async fn register(
    State(state): State<UsersState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, DocketError> {
    let mut account = state
        .user_service
        .register(req.username, req.email, req.password)
        .await?;
    let token = state.user_service.generate_auth_token(&mut account).await?;

    Ok(([(AUTH_HEADER, token)], Json(account.public_view())))
}

/// Login with email and password
pub async fn login(
    State(state): State<UsersState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, DocketError> {
    let mut account = state
        .user_service
        .find_by_credentials(&req.email, &req.password)
        .await
        .map_err(|e| match e {
            // Unknown email and wrong password look the same to the client
            DocketError::NotFound { .. } => DocketError::Credential,
            other => other,
        })?;
    let token = state.user_service.generate_auth_token(&mut account).await?;

    Ok(([(AUTH_HEADER, token)], Json(account.public_view())))
}

pub async fn me(user: AuthenticatedUser) -> ApiResult<PublicUser> {
    Ok(Json(user.account.public_view()))
}

pub async fn logout(
    State(state): State<UsersState>,
    user: AuthenticatedUser,
) -> Result<StatusCode, DocketError> {
    let AuthenticatedUser { mut account, token } = user;
    state.user_service.remove_token(&mut account, &token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create users router
pub fn users_router(state: UsersState) -> Router {
    Router::new()
        .route("/", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/me/token", delete(logout))
        .with_state(state)
}
