//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod application_repository;
mod dataset_repository;
mod key_value_store;
mod legacy_item_store;
mod storage_key;
mod user_directory;

#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{ApplicationRepository, ApplicationRepositoryError};
#[cfg(test)]
pub use dataset_repository::MockDatasetRepository;
pub use dataset_repository::{DatasetRepository, DatasetRepositoryError};
#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError};
#[cfg(test)]
pub use legacy_item_store::MockLegacyItemStore;
pub use legacy_item_store::{LegacyItemStore, LegacyItemStoreError};
pub use storage_key::{
    APPLICATIONS_KEY, DATASET_KEY_PREFIX, KEY_PREFIX, LEGACY_ITEMS_KEY_PREFIX, StorageKey,
    StorageKeyValidationError,
};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
