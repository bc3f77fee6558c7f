//! Docket Record Entity
//!
//! One audit event as submitted by an application. Records are written once
//! and never updated or deleted by this service.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DocketError, Result};

/// Typed view of a docket record.
///
/// The wire names (`createdBy`, `keyDataAsJSON`, ...) match the schema in
/// [`crate::schema::DOCKET_SCHEMA`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocketRecord {
    /// Assigned on insert
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Event name (e.g., "LOGIN_EVENT")
    pub name: String,

    /// Application that raised the event
    pub application: String,

    /// Origin inside the application (e.g., "APPLICATION", "BATCH")
    pub source: String,

    pub created_by: String,

    pub ip_address: String,

    /// Severity, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    pub status: String,

    /// ISO 8601 timestamp of the event
    pub event_date_time: String,

    #[serde(rename = "keyDataAsJSON")]
    pub key_data_as_json: String,

    pub details: String,
}

impl DocketRecord {
    pub fn builder(name: impl Into<String>) -> DocketRecordBuilder {
        DocketRecordBuilder::new(name)
    }

    /// JSON form suitable for validation and `DocketService::save`
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| DocketError::validation(format!("unencodable docket record: {}", e)))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| DocketError::validation(format!("not a docket record: {}", e)))
    }
}

/// Fluent construction of a [`DocketRecord`].
///
/// `event_date_time` defaults to the current time when not set; every other
/// required field must be supplied.
#[derive(Debug, Clone, Default)]
pub struct DocketRecordBuilder {
    name: String,
    application: Option<String>,
    source: Option<String>,
    created_by: Option<String>,
    ip_address: Option<String>,
    level: Option<String>,
    status: Option<String>,
    event_date_time: Option<String>,
    key_data_as_json: Option<String>,
    details: Option<String>,
}

impl DocketRecordBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn created_by(mut self, user: impl Into<String>) -> Self {
        self.created_by = Some(user.into());
        self
    }

    pub fn ip(mut self, addr: impl Into<String>) -> Self {
        self.ip_address = Some(addr.into());
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn event_date_time(mut self, at: impl Into<String>) -> Self {
        self.event_date_time = Some(at.into());
        self
    }

    pub fn key_data(mut self, key_data: impl Into<String>) -> Self {
        self.key_data_as_json = Some(key_data.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn build(self) -> Result<DocketRecord> {
        fn required(value: Option<String>, field: &str) -> Result<String> {
            value.ok_or_else(|| DocketError::validation(format!("{} is required", field)))
        }

        Ok(DocketRecord {
            id: None,
            name: self.name,
            application: required(self.application, "application")?,
            source: required(self.source, "source")?,
            created_by: required(self.created_by, "createdBy")?,
            ip_address: required(self.ip_address, "ipAddress")?,
            level: self.level,
            status: required(self.status, "status")?,
            event_date_time: self
                .event_date_time
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            key_data_as_json: required(self.key_data_as_json, "keyDataAsJSON")?,
            details: required(self.details, "details")?,
        })
    }
}
