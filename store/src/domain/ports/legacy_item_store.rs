//! Port abstraction for the application-scoped legacy item lists.
//!
//! Applications without a linked dataset keep their items in a flat list
//! keyed by application identifier.
use async_trait::async_trait;

use crate::domain::DatasetItem;

use super::define_port_error;

define_port_error! {
    /// Errors raised by legacy item store adapters.
    pub enum LegacyItemStoreError {
        /// Local storage failed.
        Storage { message: String } => "legacy item storage failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LegacyItemStore: Send + Sync {
    /// Load the list for `application_id`.
    ///
    /// Returns `None` when no list has been stored yet, or when the stored
    /// list was unreadable and has been discarded.
    async fn load(
        &self,
        application_id: &str,
    ) -> Result<Option<Vec<DatasetItem>>, LegacyItemStoreError>;

    /// Replace the list for `application_id`.
    async fn save(
        &self,
        application_id: &str,
        items: &[DatasetItem],
    ) -> Result<(), LegacyItemStoreError>;
}
