//! Common API types and error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::error::DocketError;

/// Standard API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

pub type ApiResult<T> = Result<Json<T>, DocketError>;

impl DocketError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Duplicate { .. } => StatusCode::CONFLICT,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Credential | Self::Token { .. } => StatusCode::UNAUTHORIZED,
            Self::Persistence { .. } | Self::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Duplicate { .. } => "DUPLICATE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Credential => "INVALID_CREDENTIALS",
            Self::Token { .. } => "INVALID_TOKEN",
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }
}

impl IntoResponse for DocketError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        // Verifier detail stays in the logs
        let message = match &self {
            Self::Token { .. } => "Invalid session token".to_string(),
            other => other.to_string(),
        };

        (status, Json(ApiError::new(self.error_code(), message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(DocketError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(DocketError::duplicate("UserAccount", "email", "a@b.co").status_code(), StatusCode::CONFLICT);
        assert_eq!(DocketError::not_found("UserAccount", "x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(DocketError::Credential.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(DocketError::token("bad").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(DocketError::persistence("down").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_error_serialization() {
        let json = serde_json::to_value(ApiError::new("NOT_FOUND", "gone")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "NOT_FOUND", "message": "gone"}));
    }
}
