//! Application-scoped item lists for applications without a linked dataset.
//!
//! The first read of an application's list seeds it with mock items and
//! persists them, so later reads return the same items. A list the user has
//! emptied stays empty.

use std::sync::Arc;

use mock_data::DEFAULT_ITEM_COUNT;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use super::ports::{LegacyItemStore, LegacyItemStoreError};
use super::seeding::{SeedTarget, synthesize_items};
use super::{DatasetItem, DatasetItemDraft, Error, LocalIdGenerator, UnsavedDatasetItem};

/// Legacy item operations over a [`LegacyItemStore`].
#[derive(Clone)]
pub struct LegacyItems {
    store: Arc<dyn LegacyItemStore>,
    ids: LocalIdGenerator,
    clock: Arc<dyn Clock>,
    item_count: usize,
}

impl LegacyItems {
    pub fn new(store: Arc<dyn LegacyItemStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            ids: LocalIdGenerator::new(Arc::clone(&clock)),
            clock,
            item_count: DEFAULT_ITEM_COUNT,
        }
    }

    /// Number of items synthesized on first read.
    pub fn with_item_count(mut self, item_count: usize) -> Self {
        self.item_count = item_count;
        self
    }

    /// Items of `target`, seeding the list on first access.
    pub async fn list(&self, target: SeedTarget<'_>) -> Result<Vec<DatasetItem>, Error> {
        if let Some(items) = self
            .store
            .load(target.application_id)
            .await
            .map_err(legacy_error)?
        {
            return Ok(items);
        }

        let items = match synthesize_items(
            target,
            target.application_id,
            self.item_count,
            self.clock.utc(),
        ) {
            Ok(items) => items,
            Err(error) => {
                warn!(
                    application_id = target.application_id,
                    error = %error,
                    "mock seeding failed; starting with an empty list"
                );
                Vec::new()
            }
        };

        match self.store.save(target.application_id, &items).await {
            Ok(()) => info!(
                application_id = target.application_id,
                count = items.len(),
                "seeded legacy item list"
            ),
            Err(error) => warn!(
                application_id = target.application_id,
                error = %error,
                "seeded legacy items could not be persisted"
            ),
        }
        Ok(items)
    }

    /// Append an item. The id is `item_<applicationId>_<millis>`.
    pub async fn add(
        &self,
        target: SeedTarget<'_>,
        draft: DatasetItemDraft,
    ) -> Result<DatasetItem, Error> {
        let mut items = self.list(target).await?;
        let id = self.ids.item_id(target.application_id, |candidate| {
            items.iter().any(|item| item.id == candidate)
        });
        let unsaved = UnsavedDatasetItem::from_draft(target.application_id, draft, self.clock.utc());
        let item = DatasetItem::from_unsaved(id, unsaved);
        items.push(item.clone());
        self.persist(target.application_id, &items).await?;
        Ok(item)
    }

    /// Replace the item `item_id`.
    pub async fn update(
        &self,
        target: SeedTarget<'_>,
        item_id: &str,
        item: DatasetItem,
    ) -> Result<DatasetItem, Error> {
        let mut items = self.list(target).await?;
        let Some(slot) = items.iter_mut().find(|existing| existing.id == item_id) else {
            return Err(Error::not_found(format!(
                "item {item_id} not found for application {}",
                target.application_id
            ))
            .with_details(json!({
                "applicationId": target.application_id,
                "itemId": item_id,
            })));
        };
        let replacement = item.restamped(item_id, target.application_id, self.clock.utc());
        *slot = replacement.clone();
        self.persist(target.application_id, &items).await?;
        Ok(replacement)
    }

    /// Remove the item `item_id`, reporting whether it existed.
    pub async fn delete(&self, target: SeedTarget<'_>, item_id: &str) -> Result<bool, Error> {
        let mut items = self.list(target).await?;
        let before = items.len();
        items.retain(|item| item.id != item_id);
        if items.len() == before {
            return Ok(false);
        }
        self.persist(target.application_id, &items).await?;
        Ok(true)
    }

    async fn persist(&self, application_id: &str, items: &[DatasetItem]) -> Result<(), Error> {
        self.store
            .save(application_id, items)
            .await
            .map_err(legacy_error)
    }
}

fn legacy_error(error: LegacyItemStoreError) -> Error {
    match error {
        LegacyItemStoreError::Storage { message } => Error::internal(message),
    }
}

#[cfg(test)]
mod tests {
    //! Seed-once behaviour of legacy lists against a mocked store.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockLegacyItemStore;
    use crate::domain::test_support::fixture_clock;

    fn target() -> SeedTarget<'static> {
        SeedTarget {
            application_id: "local_1_1",
            application_name: "午饭",
            tags: &[],
        }
    }

    #[tokio::test]
    async fn first_read_seeds_and_persists() {
        let mut store = MockLegacyItemStore::new();
        store.expect_load().times(1).return_once(|_| Ok(None));
        store
            .expect_save()
            .withf(|id, items| id == "local_1_1" && items.len() == 3)
            .times(1)
            .return_once(|_, _| Ok(()));
        let legacy = LegacyItems::new(Arc::new(store), fixture_clock()).with_item_count(3);

        let items = legacy.list(target()).await.expect("seeded list");
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item.tags.is_empty()));
    }

    #[tokio::test]
    async fn stored_empty_list_is_not_reseeded() {
        let mut store = MockLegacyItemStore::new();
        store.expect_load().times(1).return_once(|_| Ok(Some(Vec::new())));
        store.expect_save().times(0);
        let legacy = LegacyItems::new(Arc::new(store), fixture_clock());

        assert!(legacy.list(target()).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn unpersisted_seed_is_still_returned() {
        let mut store = MockLegacyItemStore::new();
        store.expect_load().times(1).return_once(|_| Ok(None));
        store
            .expect_save()
            .times(1)
            .return_once(|_, _| Err(LegacyItemStoreError::storage("disk full")));
        let legacy = LegacyItems::new(Arc::new(store), fixture_clock()).with_item_count(2);

        assert_eq!(legacy.list(target()).await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn updating_an_unknown_item_is_not_found() {
        let mut store = MockLegacyItemStore::new();
        store.expect_load().times(1).return_once(|_| Ok(Some(Vec::new())));
        store.expect_save().times(0);
        let legacy = LegacyItems::new(Arc::new(store), fixture_clock());
        let stray = DatasetItem::from_unsaved(
            "ghost",
            UnsavedDatasetItem::from_draft("x", DatasetItemDraft::new("ghost"), fixture_clock().utc()),
        );

        let error = legacy
            .update(target(), "ghost", stray)
            .await
            .expect_err("missing item");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn storage_failures_surface_as_internal_errors() {
        let mut store = MockLegacyItemStore::new();
        store
            .expect_load()
            .times(1)
            .return_once(|_| Err(LegacyItemStoreError::storage("io")));
        let legacy = LegacyItems::new(Arc::new(store), fixture_clock());

        let error = legacy.list(target()).await.expect_err("storage failure");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
