//! Local legacy item lists stored under `tuna_app_data_<applicationId>`.

use std::sync::Arc;

use async_trait::async_trait;

use super::records::{Stored, read_json, write_json};
use crate::domain::DatasetItem;
use crate::domain::ports::{KeyValueStore, LegacyItemStore, LegacyItemStoreError, StorageKey};

/// [`LegacyItemStore`] over a [`KeyValueStore`].
#[derive(Clone)]
pub struct LocalLegacyItemStore {
    store: Arc<dyn KeyValueStore>,
}

impl LocalLegacyItemStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LegacyItemStore for LocalLegacyItemStore {
    async fn load(
        &self,
        application_id: &str,
    ) -> Result<Option<Vec<DatasetItem>>, LegacyItemStoreError> {
        let key = StorageKey::legacy_application_items(application_id);
        let stored = read_json(self.store.as_ref(), &key)
            .await
            .map_err(|error| LegacyItemStoreError::storage(error.to_string()))?;
        Ok(match stored {
            Stored::Present(items) => Some(items),
            Stored::Missing | Stored::Corrupt => None,
        })
    }

    async fn save(
        &self,
        application_id: &str,
        items: &[DatasetItem],
    ) -> Result<(), LegacyItemStoreError> {
        let key = StorageKey::legacy_application_items(application_id);
        write_json(self.store.as_ref(), &key, items)
            .await
            .map_err(|error| LegacyItemStoreError::storage(error.to_string()))
    }
}
