//! Repository Layer
//!
//! Storage traits with MongoDB and in-memory implementations.

pub mod docket;
pub mod user;
pub mod memory;
pub mod indexes;

pub use docket::{DocketRepository, MongoDocketRepository};
pub use user::{MongoUserRepository, UserRepository};
pub use memory::{MemoryDocketRepository, MemoryUserRepository};
pub use indexes::ensure_indexes;

use mongodb::bson::Bson;

/// Lookup key for an `_id` of any BSON type.
///
/// Equal ids give equal keys regardless of integer width, and a string id
/// never collides with a number of the same digits.
pub fn id_key(id: &Bson) -> String {
    id.clone().into_relaxed_extjson().to_string()
}
