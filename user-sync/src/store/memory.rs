//! In-process user store.
//!
//! Mirrors the MongoDB store's semantics (duplicate ids rejected on create,
//! update without upsert, idempotent delete) and counts every call so callers
//! can assert which operations a request performed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, UserStore};
use crate::model::UserRecord;

#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<MemoryUserStoreInner>,
}

#[derive(Default)]
struct MemoryUserStoreInner {
    users: RwLock<HashMap<String, UserRecord>>,
    connects: AtomicUsize,
    calls: AtomicUsize,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing call accounting.
    pub async fn insert(&self, user: UserRecord) {
        self.inner.users.write().await.insert(user.id.clone(), user);
    }

    /// Number of `ensure_connected` calls.
    pub fn connect_count(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    /// Number of `create`, `update`, `delete` and `find_by_id` calls.
    pub fn call_count(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.inner.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.users.read().await.is_empty()
    }

    fn record_call(&self) {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn ensure_connected(&self) -> StoreResult<()> {
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create(&self, user: &UserRecord) -> StoreResult<()> {
        self.record_call();
        user.validate().map_err(StoreError::Validation)?;

        let mut users = self.inner.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StoreError::Duplicate(user.id.clone()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &UserRecord) -> StoreResult<bool> {
        self.record_call();
        user.validate().map_err(StoreError::Validation)?;

        let mut users = self.inner.users.write().await;
        match users.get_mut(&user.id) {
            Some(existing) => {
                existing.email = user.email.clone();
                existing.name = user.name.clone();
                existing.image = user.image.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.record_call();
        Ok(self.inner.users.write().await.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<UserRecord>> {
        self.record_call();
        Ok(self.inner.users.read().await.get(id).cloned())
    }
}
