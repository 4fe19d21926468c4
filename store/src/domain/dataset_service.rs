//! Dataset operations under the remote-first, local-fallback policy.
//!
//! Every operation tries the remote adapter when a backend is configured.
//! Any remote failure is logged and the same operation runs exactly once
//! against the local adapter, whose outcome is returned. Remote errors never
//! reach the caller.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::backend_pair::log_fallback;
use super::ports::{DatasetRepository, DatasetRepositoryError};
use super::{
    BackendPair, Dataset, DatasetDraft, DatasetItem, DatasetItemDraft, Error, IdentityProvider,
    StorageMode, UnsavedDataset, UnsavedDatasetItem,
};

/// Dataset and dataset item service.
#[derive(Clone)]
pub struct DatasetService {
    datasets: BackendPair<dyn DatasetRepository>,
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
}

impl DatasetService {
    pub fn new(
        datasets: BackendPair<dyn DatasetRepository>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            datasets,
            identity,
            clock,
        }
    }

    /// Every dataset. Local results are ordered newest first.
    pub async fn list(&self) -> Result<Vec<Dataset>, Error> {
        if let Some(remote) = self.datasets.remote() {
            match remote.list().await {
                Ok(datasets) => return Ok(datasets),
                Err(error) => log_fallback("list_datasets", &error),
            }
        }
        self.datasets.local().list().await.map_err(dataset_error)
    }

    /// Fetch a dataset with its items.
    pub async fn get_by_id(&self, id: &str) -> Result<Dataset, Error> {
        if let Some(remote) = self.datasets.remote() {
            match remote.find_by_id(id).await {
                Ok(dataset) => return Ok(dataset),
                Err(error) => log_fallback("get_dataset", &error),
            }
        }
        self.datasets.local().find_by_id(id).await.map_err(dataset_error)
    }

    /// Create a dataset stamped with the acting user and the current time.
    pub async fn create(&self, draft: DatasetDraft) -> Result<Dataset, Error> {
        self.create_reporting_mode(draft)
            .await
            .map(|(dataset, _)| dataset)
    }

    /// As [`Self::create`], also reporting which store accepted the record.
    pub(crate) async fn create_reporting_mode(
        &self,
        draft: DatasetDraft,
    ) -> Result<(Dataset, StorageMode), Error> {
        let user = self.identity.current_user().await;
        let unsaved = UnsavedDataset::from_draft(draft, user.id, self.clock.utc());

        if let Some(remote) = self.datasets.remote() {
            match remote.create(&unsaved).await {
                Ok(dataset) => return Ok((dataset, StorageMode::Remote)),
                Err(error) => log_fallback("create_dataset", &error),
            }
        }
        self.datasets
            .local()
            .create(&unsaved)
            .await
            .map(|dataset| (dataset, StorageMode::Local))
            .map_err(dataset_error)
    }

    /// Replace a dataset, stamping `updatedAt`. Locally, an unknown id is
    /// stored as a new record under that id.
    pub async fn update(&self, mut dataset: Dataset) -> Result<Dataset, Error> {
        dataset.updated_at = Some(self.clock.utc());

        if let Some(remote) = self.datasets.remote() {
            match remote.update(&dataset).await {
                Ok(updated) => return Ok(updated),
                Err(error) => log_fallback("update_dataset", &error),
            }
        }
        self.datasets.local().update(&dataset).await.map_err(dataset_error)
    }

    /// Delete a dataset and its items; `false` when it did not exist.
    pub async fn delete(&self, id: &str) -> Result<bool, Error> {
        if let Some(remote) = self.datasets.remote() {
            match remote.delete(id).await {
                Ok(removed) => return Ok(removed),
                Err(error) => log_fallback("delete_dataset", &error),
            }
        }
        self.datasets.local().delete(id).await.map_err(dataset_error)
    }

    /// Items of a dataset; empty when the dataset holds none.
    pub async fn items(&self, dataset_id: &str) -> Result<Vec<DatasetItem>, Error> {
        if let Some(remote) = self.datasets.remote() {
            match remote.list_items(dataset_id).await {
                Ok(items) => return Ok(items),
                Err(error) => log_fallback("list_dataset_items", &error),
            }
        }
        self.datasets
            .local()
            .list_items(dataset_id)
            .await
            .map_err(dataset_error)
    }

    /// Append an item. The store assigns the id; ownership and `createdAt`
    /// are stamped here regardless of the draft's contents.
    pub async fn add_item(
        &self,
        dataset_id: &str,
        draft: DatasetItemDraft,
    ) -> Result<DatasetItem, Error> {
        let unsaved = UnsavedDatasetItem::from_draft(dataset_id, draft, self.clock.utc());

        if let Some(remote) = self.datasets.remote() {
            match remote.add_item(dataset_id, &unsaved).await {
                Ok(item) => return Ok(item),
                Err(error) => log_fallback("add_dataset_item", &error),
            }
        }
        self.datasets
            .local()
            .add_item(dataset_id, &unsaved)
            .await
            .map_err(dataset_error)
    }

    /// Replace the item `item_id`, stamping `updatedAt`.
    pub async fn update_item(
        &self,
        dataset_id: &str,
        item_id: &str,
        item: DatasetItem,
    ) -> Result<DatasetItem, Error> {
        let item = item.restamped(item_id, dataset_id, self.clock.utc());

        if let Some(remote) = self.datasets.remote() {
            match remote.update_item(dataset_id, &item).await {
                Ok(updated) => return Ok(updated),
                Err(error) => log_fallback("update_dataset_item", &error),
            }
        }
        self.datasets
            .local()
            .update_item(dataset_id, &item)
            .await
            .map_err(dataset_error)
    }

    /// Remove an item; `false` when it did not exist.
    pub async fn delete_item(&self, dataset_id: &str, item_id: &str) -> Result<bool, Error> {
        if let Some(remote) = self.datasets.remote() {
            match remote.delete_item(dataset_id, item_id).await {
                Ok(removed) => return Ok(removed),
                Err(error) => log_fallback("delete_dataset_item", &error),
            }
        }
        self.datasets
            .local()
            .delete_item(dataset_id, item_id)
            .await
            .map_err(dataset_error)
    }

    /// Fill a local dataset that has no items yet. A dataset that already
    /// holds items is left alone.
    pub(crate) async fn seed_local(
        &self,
        dataset_id: &str,
        items: Vec<DatasetItem>,
    ) -> Result<(), Error> {
        let local = self.datasets.local();
        let mut dataset = local.find_by_id(dataset_id).await.map_err(dataset_error)?;
        if !dataset.datas.is_empty() {
            return Ok(());
        }
        let count = items.len();
        dataset.datas = items;
        local.update(&dataset).await.map_err(dataset_error)?;
        info!(dataset_id, count, "seeded local dataset");
        Ok(())
    }
}

pub(crate) fn dataset_error(error: DatasetRepositoryError) -> Error {
    match error {
        DatasetRepositoryError::NotFound { id } => {
            Error::not_found(format!("dataset {id} not found"))
                .with_details(json!({ "datasetId": id }))
        }
        DatasetRepositoryError::ItemNotFound {
            dataset_id,
            item_id,
        } => Error::not_found(format!(
            "item {item_id} not found in dataset {dataset_id}"
        ))
        .with_details(json!({ "datasetId": dataset_id, "itemId": item_id })),
        other => Error::internal(other.to_string()),
    }
}

#[cfg(test)]
#[path = "dataset_service_tests.rs"]
mod tests;
