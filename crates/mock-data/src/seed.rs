//! Request and output types for mock item synthesis.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Describes the application a batch of mock items is synthesized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockItemRequest<'a> {
    /// Identifier of the owning application; embedded in every item id.
    pub application_id: &'a str,
    /// Display name of the owning application; prefixes every item name.
    pub application_name: &'a str,
    /// Tag vocabulary items draw from.
    pub tags: &'a [String],
    /// Number of items to produce.
    pub count: usize,
}

impl<'a> MockItemRequest<'a> {
    /// Build a request for `count` items.
    #[must_use]
    pub const fn new(
        application_id: &'a str,
        application_name: &'a str,
        tags: &'a [String],
        count: usize,
    ) -> Self {
        Self {
            application_id,
            application_name,
            tags,
            count,
        }
    }

    /// Check that the request yields well-formed item ids. Any name is
    /// accepted, blank ones included.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the application id is blank.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.application_id.trim().is_empty() {
            return Err(GenerationError::EmptyApplicationId);
        }
        Ok(())
    }
}

/// A synthesized item, ready to be mapped into a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockItemSeed {
    /// Stable identifier, `data_<appId>_<i>`.
    pub id: String,
    /// Display name, `"<appName> 数据 <i>"`.
    pub name: String,
    /// Tags drawn from the request vocabulary.
    pub tags: Vec<String>,
}
