//! Dockets API
//!
//! - POST /dockets/validate - Schema check only
//! - POST /dockets - Validate then store
//! - GET /dockets/:id - Fetch a stored record

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::api::common::{ApiError, ApiResult};
use crate::error::DocketError;
use crate::schema::Violation;
use crate::service::DocketService;

/// Validation response
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

#[derive(Clone)]
pub struct DocketsState {
    pub docket_service: DocketService,
}

/// Check a record against the docket schema without storing it
pub async fn validate_docket(
    State(state): State<DocketsState>,
    Json(record): Json<Value>,
) -> ApiResult<ValidateResponse> {
    let report = state.docket_service.check(&record).await?;
    Ok(Json(ValidateResponse {
        valid: report.is_valid(),
        violations: report.violations,
    }))
}

/// Store a record. Invalid records are refused with 422 and never written.
pub async fn create_docket(
    State(state): State<DocketsState>,
    Json(record): Json<Value>,
) -> Result<Response, DocketError> {
    let report = state.docket_service.check(&record).await?;
    if !report.is_valid() {
        let details = serde_json::to_value(&report.violations)
            .map_err(|e| DocketError::validation(e.to_string()))?;
        let body = ApiError::new("SCHEMA_VIOLATION", report.summary()).with_details(details);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response());
    }

    let stored = state.docket_service.save(&record).await?;
    Ok((StatusCode::CREATED, Json(stored)).into_response())
}

pub async fn get_docket(
    State(state): State<DocketsState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let record = state
        .docket_service
        .find_by_id(&id)
        .await?
        .ok_or_else(|| DocketError::not_found("Docket", &id))?;
    Ok(Json(record))
}

/// Create dockets router
pub fn dockets_router(state: DocketsState) -> Router {
    Router::new()
        .route("/", post(create_docket))
        .route("/validate", post(validate_docket))
        .route("/:id", get(get_docket))
        .with_state(state)
}
