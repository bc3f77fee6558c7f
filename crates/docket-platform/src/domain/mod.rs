//! Domain Models
//!
//! All stored entities use 24-character hex object id strings as `_id`.

pub mod docket;
pub mod user;

pub use docket::*;
pub use user::*;

/// Fresh identifier for a new document
pub fn new_object_id() -> String {
    mongodb::bson::oid::ObjectId::new().to_hex()
}
