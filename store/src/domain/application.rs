//! Application data model.
//!
//! An application is a configured wheel: a name, tags and an optional link to
//! the dataset holding its items. The link is a weak reference; the
//! application stores only the dataset identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Caller-supplied fields for a new application.
///
/// # Examples
/// ```
/// use tuna_store::domain::ApplicationDraft;
///
/// let draft = ApplicationDraft::new("午饭").with_tags(["面", "饭"]);
/// assert_eq!(draft.tags, vec!["面".to_owned(), "饭".to_owned()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ApplicationDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
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

/// A stamped application awaiting an identifier from the store.
///
/// This is the body posted to `POST /api/applications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsavedApplication {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
}

impl UnsavedApplication {
    /// Stamp a draft with its author and creation time.
    pub fn from_draft(
        draft: ApplicationDraft,
        created_by: UserId,
        now: DateTime<Utc>,
        dataset_id: Option<String>,
    ) -> Self {
        let ApplicationDraft {
            name,
            description,
            logo,
            tags,
        } = draft;
        Self {
            name,
            description,
            logo,
            tags,
            created_by,
            created_at: now,
            updated_at: now,
            dataset_id,
        }
    }
}

/// A persisted application.
///
/// ## Invariants
/// - `id` is assigned by the store that accepted the record, never by the
///   caller.
/// - `dataset_id`, when present, names a dataset in the same store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
}

impl Application {
    /// Attach a store-assigned identifier to an unsaved application.
    pub fn from_unsaved(id: impl Into<String>, unsaved: UnsavedApplication) -> Self {
        let UnsavedApplication {
            name,
            description,
            logo,
            tags,
            created_by,
            created_at,
            updated_at,
            dataset_id,
        } = unsaved;
        Self {
            id: id.into(),
            name,
            description,
            logo,
            tags,
            created_by,
            created_at,
            updated_at,
            dataset_id,
        }
    }
}
