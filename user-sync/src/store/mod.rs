//! Storage port for mirrored user records.
//!
//! The webhook handler only talks to [`UserStore`]; the MongoDB-backed
//! implementation is used in production and the in-memory one in tests.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::UserRecord;

pub use memory::MemoryUserStore;
pub use mongo::MongoUserStore;

/// Errors raised by a [`UserStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to connect to document store: {0}")]
    Connection(String),

    #[error("User validation failed: {0} is required")]
    Validation(&'static str),

    #[error("Duplicate user id: {0}")]
    Duplicate(String),

    #[error("Document store error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations keyed by the provider user id.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Connect if no live connection exists. Safe to call on every request.
    async fn ensure_connected(&self) -> StoreResult<()>;

    /// Insert a new record. Fails if the id already exists.
    async fn create(&self, user: &UserRecord) -> StoreResult<()>;

    /// Overwrite `email`, `name` and `image` of the record with `user.id`.
    ///
    /// Returns `false` when no record matched; nothing is inserted.
    async fn update(&self, user: &UserRecord) -> StoreResult<bool>;

    /// Remove the record with `id`. Returns `false` when nothing matched.
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<UserRecord>>;
}
