//! Port abstraction for the local key/value store backing local mode.
//!
//! Values are opaque strings (JSON documents in practice). Adapters provide
//! no cross-call locking: a read-modify-write sequence spanning `get` and
//! `set` may lose a concurrent update, and the last write wins.
use async_trait::async_trait;

use super::{StorageKey, define_port_error};

define_port_error! {
    /// Errors raised by key/value store adapters.
    pub enum KeyValueStoreError {
        /// The underlying storage failed to read or write.
        Backend { message: String } => "local key/value store failure: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &StorageKey) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &StorageKey, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove `key`, reporting whether it existed.
    async fn remove(&self, key: &StorageKey) -> Result<bool, KeyValueStoreError>;

    /// List stored keys starting with `prefix`, in ascending order.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<StorageKey>, KeyValueStoreError>;
}
