//! Keys naming records in the local key/value store.
//!
//! The key layout is a stable contract shared with previously persisted data:
//!
//! | Key                         | Value                         |
//! |-----------------------------|-------------------------------|
//! | `tuna_apps`                 | JSON array of applications    |
//! | `tuna_dataset_<datasetId>`  | JSON dataset, items embedded  |
//! | `tuna_app_data_<appId>`     | JSON array of legacy items    |
use thiserror::Error;

/// Prefix shared by every key the store writes.
pub const KEY_PREFIX: &str = "tuna_";
/// Key of the flat application list.
pub const APPLICATIONS_KEY: &str = "tuna_apps";
/// Prefix of per-dataset keys.
pub const DATASET_KEY_PREFIX: &str = "tuna_dataset_";
/// Prefix of per-application legacy item keys.
pub const LEGACY_ITEMS_KEY_PREFIX: &str = "tuna_app_data_";

/// Key for a local record.
///
/// Identifiers are opaque, so any non-empty text forms a key. Adapters that
/// map keys onto a narrower namespace, such as file names, encode them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    /// Construct a key, rejecting empty text.
    pub fn new(value: impl Into<String>) -> Result<Self, StorageKeyValidationError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(StorageKeyValidationError::Empty);
        }
        Ok(Self(raw))
    }

/// Key of the application list.
    pub fn applications() -> Self {
        Self(APPLICATIONS_KEY.to_owned())
    }

    /// Key of the dataset record `dataset_id`.
    ///
    /// # Examples
    /// ```
    /// use tuna_store::domain::ports::StorageKey;
    ///
    /// let key = StorageKey::dataset("dataset_1_2");
    /// assert_eq!(key.as_str(), "tuna_dataset_dataset_1_2");
    /// assert_eq!(StorageKey::dataset("ds:7").dataset_id(), Some("ds:7"));
    /// ```
    pub fn dataset(dataset_id: &str) -> Self {
        Self(format!("{DATASET_KEY_PREFIX}{dataset_id}"))
    }

    /// Key of the legacy item list belonging to `application_id`.
    pub fn legacy_application_items(application_id: &str) -> Self {
        Self(format!("{LEGACY_ITEMS_KEY_PREFIX}{application_id}"))
    }

    /// Dataset identifier encoded in a dataset key.
    pub fn dataset_id(&self) -> Option<&str> {
        self.0
            .strip_prefix(DATASET_KEY_PREFIX)
            .filter(|id| !id.is_empty())
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`StorageKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageKeyValidationError {
    /// Key is empty.
    #[error("storage key must not be empty")]
    Empty,
}
