//! Docket Schema Definition
//!
//! The JSON schema below is the compatibility contract for what a valid
//! docket record is. Field names, types and the required list must stay
//! byte-for-byte stable across releases.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{DocketError, Result};

/// JSON Schema representation of the docket model
pub const DOCKET_SCHEMA: &str = r##"{
  "$schema": "http://json-schema.org/draft-06/schema#",
  "title": "DocketModel",
  "type": "object",
  "properties": {
    "name": {
      "type": "string"
    },
    "application": {
      "type": "string"
    },
    "source": {
      "type": "string"
    },
    "createdBy": {
      "type": "string"
    },
    "ipAddress": {
      "type": "string"
    },
    "level": {
      "type": "string"
    },
    "status": {
      "type": "string"
    },
    "eventDateTime": {
      "type": "string"
    },
    "keyDataAsJSON": {
      "type": "string"
    },
    "details": {
      "type": "string"
    }
  },
  "required": ["name", "application", "source", "createdBy", "ipAddress", "status", "keyDataAsJSON", "details", "eventDateTime"]
}"##;

/// JSON primitive types a property may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl PrimitiveType {
    /// Whether `value` is an instance of this type. No coercion: `"1"` is not a number.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => match value {
                Value::Number(n) => {
                    n.is_i64() || n.is_u64() || n.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
                }
                _ => false,
            },
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Null => value.is_null(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON type name of a value, as used in violation messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    #[serde(rename = "type")]
    pub kind: PrimitiveType,
}

/// A flat object schema: property name to primitive type plus a required list.
///
/// Properties keep their declaration order so violations are reported in a
/// stable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(rename = "$schema")]
    pub dialect: String,

    pub title: String,

    #[serde(rename = "type")]
    pub root_type: PrimitiveType,

    pub properties: IndexMap<String, PropertyDef>,

    #[serde(default)]
    pub required: Vec<String>,
}

impl SchemaDefinition {
    /// Parse and sanity-check a schema document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let schema: SchemaDefinition = serde_json::from_str(raw)
            .map_err(|e| DocketError::validation(format!("malformed schema: {}", e)))?;

        if schema.root_type != PrimitiveType::Object {
            return Err(DocketError::validation(format!(
                "malformed schema: root type must be object, found {}",
                schema.root_type
            )));
        }

        if let Some(undeclared) = schema.required.iter().find(|f| !schema.properties.contains_key(*f)) {
            return Err(DocketError::validation(format!(
                "malformed schema: required field '{}' is not declared",
                undeclared
            )));
        }

        Ok(schema)
    }

    /// The built-in docket schema
    pub fn docket() -> Result<Self> {
        Self::from_json(DOCKET_SCHEMA)
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.iter().any(|r| r == field)
    }

    pub fn field_type(&self, field: &str) -> Option<PrimitiveType> {
        self.properties.get(field).map(|p| p.kind)
    }
}
