//! Index bootstrap for the MongoDB collections

use mongodb::bson::Document;
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::info;

use crate::domain::UserAccount;
use crate::error::Result;

/// Unique indexes backing the account uniqueness rules
pub fn user_indexes() -> Vec<IndexModel> {
    ["username", "email"]
        .into_iter()
        .map(|field| {
            let mut keys = Document::new();
            keys.insert(field, 1);
            IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(format!("{}_unique", field))
                        .build(),
                )
                .build()
        })
        .collect()
}

/// Create the indexes if missing. Safe to call on every start.
pub async fn ensure_indexes(db: &Database, user_collection: &str) -> Result<()> {
    let users = db.collection::<UserAccount>(user_collection);
    users.create_indexes(user_indexes()).await?;
    info!(collection = user_collection, "User account indexes ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_user_indexes_are_unique() {
        let indexes = user_indexes();
        assert_eq!(indexes.len(), 2);
        for index in &indexes {
            let options = index.options.as_ref().unwrap();
            assert_eq!(options.unique, Some(true));
        }
        assert_eq!(indexes[0].keys, doc! { "username": 1 });
        assert_eq!(indexes[1].keys, doc! { "email": 1 });
    }
}
