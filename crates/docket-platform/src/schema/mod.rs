//! Docket Schema
//!
//! The declarative draft-06 description of a docket record and the
//! structural validator that applies it.

pub mod definition;
pub mod validator;

pub use definition::{json_type_name, PrimitiveType, PropertyDef, SchemaDefinition, DOCKET_SCHEMA};
pub use validator::{SchemaValidator, ValidationReport, Violation, ViolationKind};
