//! API Layer
//!
//! REST endpoints for docket records and user sessions.

pub mod common;
pub mod middleware;
pub mod dockets;
pub mod users;

pub use common::*;
pub use middleware::{AuthenticatedUser, AUTH_HEADER};
pub use dockets::{DocketsState, dockets_router};
pub use users::{UsersState, users_router};

use axum::{routing::get, Json, Router};

use crate::service::{DocketService, UserService};

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Full application router
pub fn create_router(docket_service: DocketService, user_service: UserService) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/dockets", dockets_router(DocketsState { docket_service }))
        .nest("/users", users_router(UsersState { user_service }))
}
