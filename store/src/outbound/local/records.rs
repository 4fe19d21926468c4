//! JSON encoding of records held in a [`KeyValueStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError, StorageKey};

/// Outcome of reading one record.
#[derive(Debug)]
pub(super) enum Stored<T> {
    Missing,
    Present(T),
    /// The stored text did not decode; it has been logged and should be
    /// treated as absent or re-initialised by the caller.
    Corrupt,
}

pub(super) async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &StorageKey,
) -> Result<Stored<T>, KeyValueStoreError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(Stored::Missing);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Stored::Present(value)),
        Err(error) => {
            warn!(key = %key, error = %error, "discarding unreadable local record");
            Ok(Stored::Corrupt)
        }
    }
}

pub(super) async fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &StorageKey,
    value: &T,
) -> Result<(), KeyValueStoreError> {
    let encoded = serde_json::to_string(value)
        .map_err(|error| KeyValueStoreError::backend(format!("encoding {key} failed: {error}")))?;
    store.set(key, &encoded).await
}
