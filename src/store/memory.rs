use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{parse_id, StoreError, UserDocument, UserStore};
use crate::model::{NewUser, User, UserPatch};

/// In-process user store.
///
/// Records live in insertion order behind an async lock. Identifiers are
/// generated and parsed exactly as the MongoDB adapter does, so a malformed
/// id is "not found" here too.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<UserDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.iter().cloned().map(User::from).collect())
    }

    async fn find(&self, id: &str) -> Result<Option<User>, StoreError> {
        let Some(oid) = parse_id(id) else { return Ok(None) };
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == oid).cloned().map(User::from))
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let doc = UserDocument::new(user);
        self.users.write().await.push(doc.clone());
        Ok(doc.into())
    }

    async fn update(&self, id: &str, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let Some(oid) = parse_id(id) else { return Ok(None) };
        let mut users = self.users.write().await;
        let Some(doc) = users.iter_mut().find(|u| u.id == oid) else {
            return Ok(None);
        };
        let mut user = User::from(doc.clone());
        patch.apply(&mut user);
        doc.first_name.clone_from(&user.first_name);
        doc.last_name.clone_from(&user.last_name);
        doc.hobby.clone_from(&user.hobby);
        Ok(Some(user))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let Some(oid) = parse_id(id) else { return Ok(false) };
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != oid);
        Ok(users.len() != before)
    }
}
