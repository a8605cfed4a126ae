use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};
use tracing::debug;

use super::{parse_id, StoreError, UserDocument, UserStore};
use crate::model::{NewUser, User, UserPatch};

const COLLECTION: &str = "users";

/// Database used when neither the configuration nor the URI names one.
pub const DEFAULT_DATABASE: &str = "test";

/// User store backed by the `users` collection of a MongoDB database.
///
/// The driver's client pools connections internally; cloning the store
/// shares that pool.
#[derive(Clone, Debug)]
pub struct MongoStore {
    users: Collection<UserDocument>,
}

impl MongoStore {
    /// Connects to `uri` and verifies the server answers a `ping`.
    ///
    /// The driver connects lazily, so without the ping a bad URI or an
    /// unreachable server would only surface on the first request.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let db = database_for(&client, database);
        db.run_command(doc! { "ping": 1 }).await?;
        debug!(database = %db.name(), "mongodb ping ok");
        Ok(Self::new(&db))
    }

    pub fn new(db: &Database) -> Self {
        Self { users: db.collection(COLLECTION) }
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let docs: Vec<UserDocument> = self.users.find(doc! {}).await?.try_collect().await?;
        Ok(docs.into_iter().map(User::from).collect())
    }

    async fn find(&self, id: &str) -> Result<Option<User>, StoreError> {
        let Some(oid) = parse_id(id) else { return Ok(None) };
        let found = self.users.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let doc = UserDocument::new(user);
        self.users.insert_one(&doc).await?;
        Ok(doc.into())
    }

    async fn update(&self, id: &str, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let Some(oid) = parse_id(id) else { return Ok(None) };

        if patch.is_empty() {
            return self.find(id).await;
        }

        let updated = self
            .users
            .find_one_and_update(doc! { "_id": oid }, set_document(&patch))
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(User::from))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let Some(oid) = parse_id(id) else { return Ok(false) };
        let result = self.users.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }
}

/// `name` if given, else the database named in the connection string, else
/// [`DEFAULT_DATABASE`].
fn database_for(client: &Client, name: Option<&str>) -> Database {
    match name {
        Some(name) => client.database(name),
        None => client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
    }
}

/// The `$set` update for the fields `patch` replaces.
fn set_document(patch: &UserPatch) -> Document {
    let mut set = Document::new();
    for (field, value) in patch.changes() {
        set.insert(field.key(), value);
    }
    doc! { "$set": set }
}
