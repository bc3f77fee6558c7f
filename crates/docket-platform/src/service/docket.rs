//! Docket Service
//!
//! Public façade over the schema validator and the docket repository.
//! `validate` and `save` are independent: `save` never re-validates, and
//! callers are expected to check a record before saving it.

use mongodb::bson::{self, Bson, Document};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::domain::DocketRecord;
use crate::error::Result;
use crate::repository::DocketRepository;
use crate::schema::{SchemaValidator, ValidationReport};

#[derive(Clone)]
pub struct DocketService {
    validator: Arc<SchemaValidator>,
    repo: Arc<dyn DocketRepository>,
}

impl DocketService {
    pub fn new(validator: Arc<SchemaValidator>, repo: Arc<dyn DocketRepository>) -> Self {
        Self { validator, repo }
    }

    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    /// `true` when `record` satisfies the docket schema.
    ///
    /// Missing or mistyped fields give `Ok(false)`; a non-object record is an error.
    pub async fn validate(&self, record: &Value) -> Result<bool> {
        self.validator.validate(record)
    }

    /// Same pass as [`validate`](Self::validate), keeping every violation
    pub async fn check(&self, record: &Value) -> Result<ValidationReport> {
        self.validator.check(record)
    }

    /// Insert `record` as a new document and return it as stored, `_id` included.
    pub async fn save(&self, record: &Value) -> Result<Value> {
        let document = bson::to_document(record)?;
        let stored = self.repo.insert(document).await?;
        debug!(id = ?stored.get("_id"), "Docket record saved");
        Ok(document_to_json(stored))
    }

    /// Typed variant of [`save`](Self::save)
    pub async fn save_record(&self, record: &DocketRecord) -> Result<DocketRecord> {
        let stored = self.save(&record.to_value()?).await?;
        DocketRecord::from_value(stored)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Value>> {
        Ok(self.repo.find_by_id(id).await?.map(document_to_json))
    }

    pub async fn count(&self) -> Result<u64> {
        self.repo.count().await
    }
}

fn document_to_json(document: Document) -> Value {
    Bson::Document(document).into_relaxed_extjson()
}
