//! Dataset and dataset item data model.
//!
//! A dataset owns its items by composition: they are embedded in the dataset
//! record and share its lifetime. Items carry a fixed set of fields the store
//! manipulates plus an open attribute bag for whatever else callers attach.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::UserId;

/// Caller-supplied fields for a new dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DatasetDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// A stamped dataset awaiting an identifier; the body of `POST /api/datasets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsavedDataset {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub datas: Vec<DatasetItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UnsavedDataset {
    /// Stamp a draft with its author and creation time. New datasets start
    /// without items.
    pub fn from_draft(draft: DatasetDraft, created_by: UserId, now: DateTime<Utc>) -> Self {
        let DatasetDraft {
            name,
            description,
            tags,
        } = draft;
        Self {
            name,
            description,
            tags,
            datas: Vec::new(),
            created_by: Some(created_by),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// A persisted dataset with its embedded items.
///
/// ## Invariants
/// - Item identifiers are unique within `datas`.
/// - Every item's `dataset_id` equals `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub datas: Vec<DatasetItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Dataset {
    /// Attach a store-assigned identifier to an unsaved dataset.
    pub fn from_unsaved(id: impl Into<String>, unsaved: UnsavedDataset) -> Self {
        let UnsavedDataset {
            name,
            description,
            tags,
            datas,
            created_by,
            created_at,
            updated_at,
        } = unsaved;
        Self {
            id: id.into(),
            name,
            description,
            tags,
            datas,
            created_by,
            created_at,
            updated_at,
        }
    }

    /// Empty record used to re-initialise a local dataset whose stored form
    /// could not be read.
    ///
    /// # Examples
    /// ```
    /// use tuna_store::domain::Dataset;
    ///
    /// let dataset = Dataset::placeholder("dataset_1_2");
    /// assert_eq!(dataset.name, "Dataset dataset_1_2");
    /// assert!(dataset.datas.is_empty());
    /// ```
    pub fn placeholder(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: format!("Dataset {id}"),
            description: Some("Local dataset".to_owned()),
            id,
            tags: Vec::new(),
            datas: Vec::new(),
            created_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Locate an item by identifier.
    pub fn item(&self, item_id: &str) -> Option<&DatasetItem> {
        self.datas.iter().find(|item| item.id == item_id)
    }
}

/// Caller-supplied fields for a new dataset item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetItemDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl DatasetItemDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// A dataset item stamped with its owner and creation time; the body of
/// `POST /api/datasets/{id}/items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsavedDatasetItem {
    pub dataset_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl UnsavedDatasetItem {
    /// Bind a draft to `dataset_id`. Any owner the caller put in the
    /// attribute bag is discarded.
    pub fn from_draft(
        dataset_id: impl Into<String>,
        draft: DatasetItemDraft,
        now: DateTime<Utc>,
    ) -> Self {
        let DatasetItemDraft {
            name,
            description,
            category,
            tags,
            mut attributes,
        } = draft;
        strip_reserved(&mut attributes);
        Self {
            dataset_id: dataset_id.into(),
            name,
            description,
            category,
            tags,
            created_at: now,
            attributes,
        }
    }
}

/// A persisted dataset item.
///
/// Unknown JSON fields land in `attributes` and are written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetItem {
    pub id: String,
    pub dataset_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl DatasetItem {
    /// Attach a store-assigned identifier to an unsaved item.
    pub fn from_unsaved(id: impl Into<String>, unsaved: UnsavedDatasetItem) -> Self {
        let UnsavedDatasetItem {
            dataset_id,
            name,
            description,
            category,
            tags,
            created_at,
            attributes,
        } = unsaved;
        Self {
            id: id.into(),
            dataset_id,
            name,
            description,
            category,
            tags,
            created_at,
            updated_at: None,
            attributes,
        }
    }

    /// Replacement for an existing slot: identity and ownership come from
    /// the store, everything else from `self`.
    pub fn restamped(
        mut self,
        id: impl Into<String>,
        dataset_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        self.id = id.into();
        self.dataset_id = dataset_id.into();
        self.updated_at = Some(now);
        self
    }
}

const RESERVED_ATTRIBUTES: [&str; 4] = ["id", "datasetId", "createdAt", "updatedAt"];

fn strip_reserved(attributes: &mut Map<String, Value>) {
    for key in RESERVED_ATTRIBUTES {
        attributes.remove(key);
    }
}
