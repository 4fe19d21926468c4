//! Local adapters backed by a key/value store.
//!
//! Records are JSON documents under the `tuna_` key namespace: one list of
//! applications, one record per dataset, and the legacy per-application item
//! lists. Both the durable directory store and the in-memory store satisfy
//! the same [`KeyValueStore`](crate::domain::ports::KeyValueStore) port.

mod application_repository;
mod dataset_repository;
mod file_store;
mod legacy_item_store;
mod memory_store;
mod records;

pub use application_repository::LocalApplicationRepository;
pub use dataset_repository::LocalDatasetRepository;
pub use file_store::FileKeyValueStore;
pub use legacy_item_store::LocalLegacyItemStore;
pub use memory_store::InMemoryKeyValueStore;
