//! Schema validator for docket records
//!
//! Validation semantics:
//! - Every required property must be present
//! - Every declared property that is present must match its declared type
//! - Undeclared properties are ignored
//! - No coercion, no defaults; `null` is a type mismatch
//!
//! The pass collects every violation instead of stopping at the first.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::definition::{json_type_name, PrimitiveType, SchemaDefinition};
use crate::error::{DocketError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ViolationKind {
    /// Required property absent
    Missing,
    /// Present but of the wrong JSON type
    TypeMismatch { expected: PrimitiveType, found: String },
}

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::Missing,
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: PrimitiveType, found: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::TypeMismatch {
                expected,
                found: found.into(),
            },
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "{}: required field is missing", self.field),
            ViolationKind::TypeMismatch { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.field, expected, found)
            }
        }
    }
}

/// Outcome of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn missing_fields(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter(|v| v.kind == ViolationKind::Missing)
            .map(|v| v.field.as_str())
            .collect()
    }

    /// One-line summary, `;`-separated
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Applies a [`SchemaDefinition`] to candidate records.
///
/// Stateless and side-effect free; safe to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Arc<SchemaDefinition>,
}

impl SchemaValidator {
    pub fn new(schema: SchemaDefinition) -> Self {
        Self { schema: Arc::new(schema) }
    }

    /// Validator for the built-in docket schema
    pub fn docket() -> Result<Self> {
        Ok(Self::new(SchemaDefinition::docket()?))
    }

    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    /// Run the structural pass and collect violations.
    ///
    /// # Errors
    ///
    /// `DocketError::Validation` when `record` is not a JSON object. A record
    /// that is an object but breaks the schema is `Ok` with violations.
    pub fn check(&self, record: &Value) -> Result<ValidationReport> {
        let obj = record.as_object().ok_or_else(|| {
            DocketError::validation(format!(
                "record must be an object, found {}",
                json_type_name(record)
            ))
        })?;

        let mut violations = Vec::new();
        for (field, def) in &self.schema.properties {
            match obj.get(field) {
                None => {
                    if self.schema.is_required(field) {
                        violations.push(Violation::missing(field));
                    }
                }
                Some(value) if !def.kind.matches(value) => {
                    violations.push(Violation::type_mismatch(field, def.kind, json_type_name(value)));
                }
                Some(_) => {}
            }
        }

        Ok(ValidationReport { violations })
    }

    /// `true` iff the record has no violations
    pub fn validate(&self, record: &Value) -> Result<bool> {
        Ok(self.check(record)?.is_valid())
    }
}
