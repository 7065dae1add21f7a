//! MongoDB-backed user store.
//!
//! The store keeps one lazily established client shared by every request.
//! The driver pools and re-establishes sockets itself, so once the initial
//! `ping` succeeds the client is reused for the lifetime of the process.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::{
    bson::doc,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    Client, Collection,
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{StoreError, StoreResult, UserStore};
use crate::model::UserRecord;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// User store with connect-if-absent semantics.
#[derive(Clone)]
pub struct MongoUserStore {
    inner: Arc<MongoUserStoreInner>,
}

struct MongoUserStoreInner {
    uri: String,
    database: String,
    collection: String,
    users: RwLock<Option<Collection<UserRecord>>>,
}

impl MongoUserStore {
    /// Create a store; no connection is made until first use.
    pub fn new(uri: String, database: String, collection: String) -> Self {
        Self {
            inner: Arc::new(MongoUserStoreInner {
                uri,
                database,
                collection,
                users: RwLock::new(None),
            }),
        }
    }

    /// Return the users collection, connecting first if needed.
    async fn users(&self) -> StoreResult<Collection<UserRecord>> {
        {
            let users = self.inner.users.read().await;
            if let Some(collection) = users.as_ref() {
                return Ok(collection.clone());
            }
        }

        let mut users = self.inner.users.write().await;

        // Double-check after acquiring write lock
        if let Some(collection) = users.as_ref() {
            return Ok(collection.clone());
        }

        info!(database = %self.inner.database, "mongodb_connecting");

        let client = Client::with_uri_str(&self.inner.uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let database = client.database(&self.inner.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!(
            database = %self.inner.database,
            collection = %self.inner.collection,
            "mongodb_connected"
        );

        let collection = database.collection::<UserRecord>(&self.inner.collection);
        *users = Some(collection.clone());

        Ok(collection)
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn ensure_connected(&self) -> StoreResult<()> {
        self.users().await.map(|_| ())
    }

    async fn create(&self, user: &UserRecord) -> StoreResult<()> {
        user.validate().map_err(StoreError::Validation)?;
        let users = self.users().await?;

        users
            .insert_one(user)
            .await
            .map_err(|e| map_write_error(e, &user.id))?;

        Ok(())
    }

    async fn update(&self, user: &UserRecord) -> StoreResult<bool> {
        user.validate().map_err(StoreError::Validation)?;
        let users = self.users().await?;

        let result = users
            .update_one(
                doc! { "_id": user.id.as_str() },
                doc! { "$set": {
                    "email": user.email.as_str(),
                    "name": user.name.as_str(),
                    "image": user.image.as_str()
                } },
            )
            .await
            .map_err(|e| map_write_error(e, &user.id))?;

        if result.matched_count == 0 {
            warn!(user_id = %user.id, "mongodb_update_no_match");
        }

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let users = self.users().await?;

        let result = users
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<UserRecord>> {
        let users = self.users().await?;

        users
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// Classify a write error, surfacing duplicate keys separately.
fn map_write_error(err: MongoError, id: &str) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE => {
            StoreError::Duplicate(id.to_string())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}
