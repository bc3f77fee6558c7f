//! Docket Repository

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use tracing::debug;

use crate::domain::new_object_id;
use crate::error::Result;

/// Insert-only store for docket documents.
///
/// Implementations do not validate; callers run the schema check first.
#[async_trait]
pub trait DocketRepository: Send + Sync {
    /// Write `record` as a new document, assigning `_id` when absent.
    /// Returns the document as stored.
    async fn insert(&self, record: Document) -> Result<Document>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>>;

    async fn count(&self) -> Result<u64>;
}

pub struct MongoDocketRepository {
    collection: Collection<Document>,
}

impl MongoDocketRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }
}

/// Give `record` a fresh `_id` unless the caller supplied one
pub(crate) fn with_assigned_id(mut record: Document) -> Document {
    if !record.contains_key("_id") {
        record.insert("_id", new_object_id());
    }
    record
}

#[async_trait]
impl DocketRepository for MongoDocketRepository {
    async fn insert(&self, record: Document) -> Result<Document> {
        let record = with_assigned_id(record);
        self.collection.insert_one(&record).await?;
        debug!(id = ?record.get("_id"), "Docket document inserted");
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
