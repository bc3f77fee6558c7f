//! Platform Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocketError {
    /// Input could not be checked (non-object record, malformed schema)
    /// or an account failed its write-time rules.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Storage operation failed: connectivity, rejected write, unencodable document.
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Duplicate entity: {entity_type} with {field}={value}")]
    Duplicate { entity_type: String, field: String, value: String },

    #[error("Entity not found: {entity_type} with {key}")]
    NotFound { entity_type: String, key: String },

    #[error("Invalid credentials")]
    Credential,

    #[error("Invalid token: {message}")]
    Token { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DocketError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence { message: message.into() }
    }

    pub fn duplicate(entity_type: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn not_found(entity_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            key: key.into(),
        }
    }

    pub fn token(message: impl Into<String>) -> Self {
        Self::Token { message: message.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}

impl From<mongodb::error::Error> for DocketError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::persistence(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for DocketError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::persistence(format!("malformed document: {}", err))
    }
}

impl From<mongodb::bson::de::Error> for DocketError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Self::persistence(format!("unreadable document: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for DocketError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::token(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocketError>;
