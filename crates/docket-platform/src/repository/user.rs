//! User Account Repository

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Collection, Database};

use crate::domain::UserAccount;
use crate::error::{DocketError, Result};

const DUPLICATE_KEY: i32 = 11000;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or fully replace the account document.
    ///
    /// Fails with `DocketError::Duplicate` when another account already
    /// holds the username or email.
    async fn save(&self, account: &UserAccount) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>>;

    /// Account `id` holding `token` under the `access` kind
    async fn find_by_token(&self, id: &str, token: &str, access: &str) -> Result<Option<UserAccount>>;

    /// Remove `token` from the stored token list. Absent token is a no-op.
    async fn pull_token(&self, id: &str, token: &str) -> Result<()>;
}

pub struct MongoUserRepository {
    collection: Collection<UserAccount>,
}

impl MongoUserRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }
}

/// Map a unique-index violation onto the offending account field
fn duplicate_error(err: &mongodb::error::Error, account: &UserAccount) -> Option<DocketError> {
    let message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => e.message.as_str(),
        _ => return None,
    };

    let (field, value) = if message.contains("username") {
        ("username", account.username.as_str())
    } else if message.contains("email") {
        ("email", account.email.as_str())
    } else {
        ("_id", account.id.as_str())
    };
    Some(DocketError::duplicate("UserAccount", field, value))
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn save(&self, account: &UserAccount) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &account.id }, account)
            .upsert(true)
            .await
            .map_err(|e| duplicate_error(&e, account).unwrap_or_else(|| e.into()))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_token(&self, id: &str, token: &str, access: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .collection
            .find_one(doc! {
                "_id": id,
                "tokens": { "$elemMatch": { "token": token, "access": access } },
            })
            .await?)
    }

    async fn pull_token(&self, id: &str, token: &str) -> Result<()> {
        self.collection
            .update_one(
                doc! { "_id": id },
                doc! { "$pull": { "tokens": { "token": token } } },
            )
            .await?;
        Ok(())
    }
}
