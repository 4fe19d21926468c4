//! Ephemeral key/value store for tests and throwaway sessions.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError, StorageKey};

/// Process-local map behind a mutex. Contents vanish with the value.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<BTreeMap<StorageKey, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, BTreeMap<StorageKey, String>>, KeyValueStoreError> {
        self.entries
            .lock()
            .map_err(|_| KeyValueStoreError::backend("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &StorageKey) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(&self, key: &StorageKey, value: &str) -> Result<(), KeyValueStoreError> {
        self.entries()?.insert(key.clone(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &StorageKey) -> Result<bool, KeyValueStoreError> {
        Ok(self.entries()?.remove(key).is_some())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<StorageKey>, KeyValueStoreError> {
        Ok(self
            .entries()?
            .keys()
            .filter(|key| key.as_str().starts_with(prefix))
            .cloned()
            .collect())
    }
}
