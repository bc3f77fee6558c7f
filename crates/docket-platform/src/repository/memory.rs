//! In-memory repositories
//!
//! Process-local stores with the same contracts as the MongoDB ones,
//! including the username/email uniqueness rules. Used for local runs
//! (`DOCKET_STORAGE=memory`) and tests.

use async_trait::async_trait;
use indexmap::IndexMap;
use mongodb::bson::{Bson, Document};
use parking_lot::RwLock;

use super::docket::{with_assigned_id, DocketRepository};
use super::id_key;
use super::user::UserRepository;
use crate::domain::UserAccount;
use crate::error::{DocketError, Result};

#[derive(Default)]
pub struct MemoryDocketRepository {
    documents: RwLock<IndexMap<String, Document>>,
}

impl MemoryDocketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocketRepository for MemoryDocketRepository {
    async fn insert(&self, record: Document) -> Result<Document> {
        let record = with_assigned_id(record);
        let key = record
            .get("_id")
            .map(id_key)
            .ok_or_else(|| DocketError::persistence("document has no _id"))?;

        let mut documents = self.documents.write();
        if documents.contains_key(&key) {
            return Err(DocketError::persistence(format!("duplicate key: _id {}", key)));
        }
        documents.insert(key, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>> {
        let key = id_key(&Bson::String(id.to_string()));
        Ok(self.documents.read().get(&key).cloned())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.documents.read().len() as u64)
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    accounts: RwLock<IndexMap<String, UserAccount>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn save(&self, account: &UserAccount) -> Result<()> {
        let mut accounts = self.accounts.write();

        for other in accounts.values().filter(|a| a.id != account.id) {
            if other.username == account.username {
                return Err(DocketError::duplicate("UserAccount", "username", &account.username));
            }
            if other.email == account.email {
                return Err(DocketError::duplicate("UserAccount", "email", &account.email));
            }
        }

        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>> {
        Ok(self.accounts.read().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        Ok(self.accounts.read().values().find(|a| a.email == email).cloned())
    }

    async fn find_by_token(&self, id: &str, token: &str, access: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .accounts
            .read()
            .get(id)
            .filter(|a| a.tokens.contains(token, access))
            .cloned())
    }

    async fn pull_token(&self, id: &str, token: &str) -> Result<()> {
        if let Some(account) = self.accounts.write().get_mut(id) {
            account.tokens.remove(token);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionToken;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_docket_insert_assigns_id() {
        let repo = MemoryDocketRepository::new();
        let stored = repo.insert(doc! { "name": "LOGIN_EVENT" }).await.unwrap();

        let id = stored.get_str("_id").unwrap();
        assert_eq!(id.len(), 24);
        assert_eq!(repo.find_by_id(&id).await.unwrap(), Some(stored));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_docket_duplicate_id_is_persistence_error() {
        let repo = MemoryDocketRepository::new();
        repo.insert(doc! { "_id": "fixed", "name": "A" }).await.unwrap();
        let err = repo.insert(doc! { "_id": "fixed", "name": "B" }).await.unwrap_err();
        assert!(matches!(err, DocketError::Persistence { .. }));
    }

    #[tokio::test]
    async fn test_docket_accepts_any_id_type() {
        let repo = MemoryDocketRepository::new();
        repo.insert(doc! { "_id": 7_i32, "name": "A" }).await.unwrap();
        repo.insert(doc! { "_id": "7", "name": "B" }).await.unwrap();

        let err = repo.insert(doc! { "_id": 7_i64, "name": "C" }).await.unwrap_err();
        assert!(matches!(err, DocketError::Persistence { .. }));

        let found = repo.find_by_id("7").await.unwrap().unwrap();
        assert_eq!(found.get_str("name").unwrap(), "B");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let repo = MemoryUserRepository::new();
        repo.save(&UserAccount::new("meghad", "meghad@example.com", "x")).await.unwrap();

        let err = repo
            .save(&UserAccount::new("meghad", "other@example.com", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocketError::Duplicate { ref field, .. } if field == "username"));

        let err = repo
            .save(&UserAccount::new("other", "meghad@example.com", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocketError::Duplicate { ref field, .. } if field == "email"));
    }

    #[tokio::test]
    async fn test_user_save_replaces_same_id() {
        let repo = MemoryUserRepository::new();
        let mut account = UserAccount::new("meghad", "meghad@example.com", "x");
        repo.save(&account).await.unwrap();

        account.tokens.issue(SessionToken::auth("t1"));
        repo.save(&account).await.unwrap();

        let found = repo.find_by_token(&account.id, "t1", "auth").await.unwrap();
        assert!(found.is_some());

        repo.pull_token(&account.id, "t1").await.unwrap();
        repo.pull_token(&account.id, "t1").await.unwrap();
        assert!(repo.find_by_token(&account.id, "t1", "auth").await.unwrap().is_none());
    }
}
