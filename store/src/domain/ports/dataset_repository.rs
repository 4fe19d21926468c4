//! Port abstraction for dataset persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Dataset, DatasetItem, UnsavedDataset, UnsavedDatasetItem};

use super::define_port_error;

define_port_error! {
    /// Errors raised by dataset repository adapters.
    pub enum DatasetRepositoryError {
        /// No dataset with this identifier exists in the adapter's store.
        NotFound { id: String } => "dataset {id} not found",
        /// The dataset exists but holds no item with this identifier.
        ItemNotFound { dataset_id: String, item_id: String } =>
            "item {item_id} not found in dataset {dataset_id}",
        /// The backend could not be reached or is not configured.
        Unavailable { message: String } => "dataset backend unavailable: {message}",
        /// The backend answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "dataset backend rejected the request with status {status}: {message}",
        /// A payload could not be decoded.
        Decode { message: String } => "dataset payload could not be decoded: {message}",
        /// Local storage failed.
        Storage { message: String } => "dataset storage failed: {message}",
    }
}

/// CRUD over [`Dataset`] records and their embedded [`DatasetItem`]s.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// List every dataset visible to this adapter.
    async fn list(&self) -> Result<Vec<Dataset>, DatasetRepositoryError>;

    /// Fetch a dataset, items included.
    async fn find_by_id(&self, id: &str) -> Result<Dataset, DatasetRepositoryError>;

    /// Persist a new dataset and return it with its assigned identifier.
    async fn create(&self, dataset: &UnsavedDataset) -> Result<Dataset, DatasetRepositoryError>;

    /// Replace the stored record carrying `dataset.id`.
    async fn update(&self, dataset: &Dataset) -> Result<Dataset, DatasetRepositoryError>;

    /// Remove a dataset and its items, reporting whether a record existed.
    async fn delete(&self, id: &str) -> Result<bool, DatasetRepositoryError>;

    /// Items of `dataset_id`; empty when the dataset holds none.
    async fn list_items(&self, dataset_id: &str) -> Result<Vec<DatasetItem>, DatasetRepositoryError>;

    /// Append an item and return it with its assigned identifier.
    async fn add_item(
        &self,
        dataset_id: &str,
        item: &UnsavedDatasetItem,
    ) -> Result<DatasetItem, DatasetRepositoryError>;

    /// Replace the item slot carrying `item.id`.
    async fn update_item(
        &self,
        dataset_id: &str,
        item: &DatasetItem,
    ) -> Result<DatasetItem, DatasetRepositoryError>;

    /// Remove an item, reporting whether it existed.
    async fn delete_item(&self, dataset_id: &str, item_id: &str)
    -> Result<bool, DatasetRepositoryError>;
}
