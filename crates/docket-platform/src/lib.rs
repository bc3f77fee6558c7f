//! Docket Platform
//!
//! Core platform providing:
//! - The docket (audit event) record and its draft-06 schema
//! - Structural validation producing a violation list
//! - Document persistence (MongoDB or in-memory)
//! - User accounts with hashed passwords and rotating session tokens
//! - An axum router exposing all of the above

pub mod domain;
pub mod schema;
pub mod repository;
pub mod service;
pub mod api;
pub mod error;

pub use domain::*;
pub use error::{DocketError, Result};
pub use schema::{SchemaDefinition, SchemaValidator, ValidationReport, Violation, ViolationKind};
pub use service::{DocketService, PasswordService, TokenService, UserService};
