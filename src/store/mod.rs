//! Persistence boundary for user records.
//!
//! [`UserStore`] is the port the controller talks to. [`MongoStore`] is the
//! production adapter; [`MemoryStore`] keeps records in process and behaves
//! the same way from the outside, identifiers included.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::model::{NewUser, User, UserPatch};

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::{MongoStore, DEFAULT_DATABASE};

/// Failures raised by store adapters.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database could not be reached or rejected the operation.
    #[error("user store query failed: {0}")]
    Query(#[from] mongodb::error::Error),
}

/// User persistence.
///
/// Identifiers arrive as the client sent them. Anything that does not parse
/// as an identifier simply matches no record, so lookups answer `None` and
/// deletes answer `false` rather than erroring.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Every stored user, in insertion order.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn find(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Stores `user` under a fresh identifier and returns the stored record.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Applies `patch` and returns the updated record, or `None` if no record
    /// has this identifier.
    async fn update(&self, id: &str, patch: UserPatch) -> Result<Option<User>, StoreError>;

    /// Removes the record. `false` means there was nothing to remove.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// A user as laid out in the `users` collection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub hobby: String,
}

impl UserDocument {
    pub(crate) fn new(user: NewUser) -> Self {
        Self {
            id: ObjectId::new(),
            first_name: user.first_name,
            last_name: user.last_name,
            hobby: user.hobby,
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            first_name: doc.first_name,
            last_name: doc.last_name,
            hobby: doc.hobby,
        }
    }
}

/// Parses a client-supplied identifier. Malformed input is "no such record".
pub(crate) fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_do_not_parse() {
        assert!(parse_id("42").is_none());
        assert!(parse_id("zzzzzzzzzzzzzzzzzzzzzzzz").is_none());
        assert!(parse_id("65a1f0c2e4b0a1b2c3d4e5f6").is_some());
    }

    #[test]
    fn documents_expose_hex_ids() {
        let oid = ObjectId::new();
        let user: User = UserDocument {
            id: oid,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            hobby: "math".into(),
        }
        .into();
        assert_eq!(user.id, oid.to_hex());
        assert_eq!(parse_id(&user.id), Some(oid));
    }
}
