//! Local datasets, one JSON record per dataset under `tuna_dataset_<id>`.
//!
//! Items are embedded in their dataset record, so every item mutation
//! rewrites the whole record. Concurrent writers race and the last write
//! wins.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::records::{Stored, read_json, write_json};
use crate::domain::ports::{
    DATASET_KEY_PREFIX, DatasetRepository, DatasetRepositoryError, KeyValueStore,
    KeyValueStoreError, StorageKey,
};
use crate::domain::{Dataset, DatasetItem, LocalIdGenerator, UnsavedDataset, UnsavedDatasetItem};

/// [`DatasetRepository`] over a [`KeyValueStore`].
#[derive(Clone)]
pub struct LocalDatasetRepository {
    store: Arc<dyn KeyValueStore>,
    ids: LocalIdGenerator,
}

impl LocalDatasetRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, ids: LocalIdGenerator) -> Self {
        Self { store, ids }
    }

    /// Read a dataset; an unreadable record is replaced by an empty
    /// placeholder.
    async fn read(&self, id: &str) -> Result<Option<Dataset>, DatasetRepositoryError> {
        match read_json(self.store.as_ref(), &StorageKey::dataset(id))
            .await
            .map_err(storage_error)?
        {
            Stored::Missing => Ok(None),
            Stored::Present(dataset) => Ok(Some(dataset)),
            Stored::Corrupt => {
                let placeholder = Dataset::placeholder(id);
                self.write(&placeholder).await?;
                Ok(Some(placeholder))
            }
        }
    }

    async fn read_existing(&self, id: &str) -> Result<Dataset, DatasetRepositoryError> {
        self.read(id)
            .await?
            .ok_or_else(|| DatasetRepositoryError::not_found(id))
    }

    async fn write(&self, dataset: &Dataset) -> Result<(), DatasetRepositoryError> {
        write_json(self.store.as_ref(), &StorageKey::dataset(&dataset.id), dataset)
            .await
            .map_err(storage_error)
    }

    async fn stored_ids(&self) -> Result<HashSet<String>, DatasetRepositoryError> {
        let keys = self
            .store
            .keys_with_prefix(DATASET_KEY_PREFIX)
            .await
            .map_err(storage_error)?;
        Ok(keys
            .iter()
            .filter_map(StorageKey::dataset_id)
            .map(str::to_owned)
            .collect())
    }
}

#[async_trait]
impl DatasetRepository for LocalDatasetRepository {
    async fn list(&self) -> Result<Vec<Dataset>, DatasetRepositoryError> {
        let keys = self
            .store
            .keys_with_prefix(DATASET_KEY_PREFIX)
            .await
            .map_err(storage_error)?;
        let mut datasets = Vec::with_capacity(keys.len());
        for key in &keys {
            if let Stored::Present(dataset) = read_json::<Dataset>(self.store.as_ref(), key)
                .await
                .map_err(storage_error)?
            {
                datasets.push(dataset);
            }
        }
        datasets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(datasets)
    }

    async fn find_by_id(&self, id: &str) -> Result<Dataset, DatasetRepositoryError> {
        self.read_existing(id).await
    }

    async fn create(&self, dataset: &UnsavedDataset) -> Result<Dataset, DatasetRepositoryError> {
        let taken = self.stored_ids().await?;
        let id = self.ids.dataset_id(|candidate| taken.contains(candidate));
        let created = Dataset::from_unsaved(id, dataset.clone());
        self.write(&created).await?;
        debug!(dataset_id = %created.id, "created local dataset");
        Ok(created)
    }

    async fn update(&self, dataset: &Dataset) -> Result<Dataset, DatasetRepositoryError> {
        if self.read(&dataset.id).await?.is_none() {
            debug!(dataset_id = %dataset.id, "storing unknown dataset as new");
        }
        self.write(dataset).await?;
        Ok(dataset.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, DatasetRepositoryError> {
        self.store
            .remove(&StorageKey::dataset(id))
            .await
            .map_err(storage_error)
    }

    async fn list_items(&self, dataset_id: &str) -> Result<Vec<DatasetItem>, DatasetRepositoryError> {
        Ok(self
            .read(dataset_id)
            .await?
            .map(|dataset| dataset.datas)
            .unwrap_or_default())
    }

    async fn add_item(
        &self,
        dataset_id: &str,
        item: &UnsavedDatasetItem,
    ) -> Result<DatasetItem, DatasetRepositoryError> {
        let mut dataset = self.read_existing(dataset_id).await?;
        let id = self.ids.item_id(dataset_id, |candidate| dataset.item(candidate).is_some());
        let mut created = DatasetItem::from_unsaved(id, item.clone());
        created.dataset_id = dataset_id.to_owned();
        dataset.datas.push(created.clone());
        self.write(&dataset).await?;
        Ok(created)
    }

    async fn update_item(
        &self,
        dataset_id: &str,
        item: &DatasetItem,
    ) -> Result<DatasetItem, DatasetRepositoryError> {
        let mut dataset = self.read_existing(dataset_id).await?;
        let slot = dataset
            .datas
            .iter_mut()
            .find(|existing| existing.id == item.id)
            .ok_or_else(|| DatasetRepositoryError::item_not_found(dataset_id, item.id.as_str()))?;
        let mut replacement = item.clone();
        replacement.dataset_id = dataset_id.to_owned();
        *slot = replacement.clone();
        self.write(&dataset).await?;
        Ok(replacement)
    }

    async fn delete_item(
        &self,
        dataset_id: &str,
        item_id: &str,
    ) -> Result<bool, DatasetRepositoryError> {
        let Some(mut dataset) = self.read(dataset_id).await? else {
            return Ok(false);
        };
        let before = dataset.datas.len();
        dataset.datas.retain(|item| item.id != item_id);
        if dataset.datas.len() == before {
            return Ok(false);
        }
        self.write(&dataset).await?;
        Ok(true)
    }
}

fn storage_error(error: KeyValueStoreError) -> DatasetRepositoryError {
    DatasetRepositoryError::storage(error.to_string())
}

#[cfg(test)]
#[path = "dataset_repository_tests.rs"]
mod tests;
