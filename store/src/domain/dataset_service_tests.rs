//! Tests for the dataset service's remote-first policy.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ports::MockDatasetRepository;
use crate::domain::test_support::{
    fixture_clock, fixture_timestamp, local_selector, remote_selector,
};
use crate::domain::{BackendSelector, ErrorCode, FixedIdentity, User, UserId};

fn service(
    remote: MockDatasetRepository,
    local: MockDatasetRepository,
    selector: BackendSelector,
) -> DatasetService {
    let remote: Arc<dyn DatasetRepository> = Arc::new(remote);
    let local: Arc<dyn DatasetRepository> = Arc::new(local);
    DatasetService::new(
        BackendPair::new(remote, local, selector),
        Arc::new(FixedIdentity::anonymous()),
        fixture_clock(),
    )
}

fn dataset(id: &str) -> Dataset {
    let unsaved = UnsavedDataset::from_draft(
        DatasetDraft::new("午饭"),
        UserId::anonymous(),
        fixture_timestamp(),
    );
    Dataset::from_unsaved(id, unsaved)
}

fn item(dataset_id: &str, id: &str) -> DatasetItem {
    let unsaved =
        UnsavedDatasetItem::from_draft(dataset_id, DatasetItemDraft::new(id), fixture_timestamp());
    DatasetItem::from_unsaved(id, unsaved)
}

#[tokio::test]
async fn remote_success_never_touches_local() {
    let mut remote = MockDatasetRepository::new();
    remote
        .expect_find_by_id()
        .times(1)
        .return_once(|id| Ok(dataset(id)));
    let mut local = MockDatasetRepository::new();
    local.expect_find_by_id().times(0);

    let found = service(remote, local, remote_selector())
        .get_by_id("remote-1")
        .await
        .expect("remote dataset");
    assert_eq!(found.id, "remote-1");
}

#[rstest]
#[case(DatasetRepositoryError::unavailable("connection refused"))]
#[case(DatasetRepositoryError::rejected(500_u16, "boom"))]
#[case(DatasetRepositoryError::not_found("remote-1"))]
#[case(DatasetRepositoryError::decode("expected value"))]
#[tokio::test]
async fn any_remote_failure_falls_back_to_local_once(#[case] failure: DatasetRepositoryError) {
    let mut remote = MockDatasetRepository::new();
    remote
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Err(failure));
    let mut local = MockDatasetRepository::new();
    local
        .expect_find_by_id()
        .times(1)
        .return_once(|id| Ok(dataset(id)));

    let found = service(remote, local, remote_selector())
        .get_by_id("dataset_1_1")
        .await
        .expect("local dataset");
    assert_eq!(found.id, "dataset_1_1");
}

#[tokio::test]
async fn local_mode_never_calls_remote() {
    let mut remote = MockDatasetRepository::new();
    remote.expect_list().times(0);
    let mut local = MockDatasetRepository::new();
    local
        .expect_list()
        .times(1)
        .return_once(|| Ok(vec![dataset("dataset_1_1")]));

    let listed = service(remote, local, local_selector())
        .list()
        .await
        .expect("local list");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn create_stamps_author_and_reports_local_mode_after_fallback() {
    let mut remote = MockDatasetRepository::new();
    remote
        .expect_create()
        .times(1)
        .return_once(|_| Err(DatasetRepositoryError::unavailable("down")));
    let mut local = MockDatasetRepository::new();
    local
        .expect_create()
        .withf(|unsaved| {
            unsaved.created_by.as_ref() == Some(&User::anonymous().id)
                && unsaved.created_at == Some(fixture_timestamp())
                && unsaved.datas.is_empty()
        })
        .times(1)
        .return_once(|unsaved| Ok(Dataset::from_unsaved("dataset_1_1", unsaved.clone())));

    let (created, mode) = service(remote, local, remote_selector())
        .create_reporting_mode(DatasetDraft::new("午饭"))
        .await
        .expect("created");
    assert_eq!(created.id, "dataset_1_1");
    assert_eq!(mode, StorageMode::Local);
}

#[tokio::test]
async fn update_stamps_updated_at() {
    let mut local = MockDatasetRepository::new();
    local
        .expect_update()
        .withf(|dataset| dataset.updated_at == Some(fixture_timestamp()))
        .times(1)
        .return_once(|dataset| Ok(dataset.clone()));
    let mut stale = dataset("dataset_1_1");
    stale.updated_at = None;

    let updated = service(MockDatasetRepository::new(), local, local_selector())
        .update(stale)
        .await
        .expect("updated");
    assert_eq!(updated.updated_at, Some(fixture_timestamp()));
}

#[tokio::test]
async fn update_item_overrides_identity_before_sending() {
    let mut remote = MockDatasetRepository::new();
    remote
        .expect_update_item()
        .withf(|dataset_id, item| {
            dataset_id == "dataset_1_1"
                && item.id == "item_dataset_1_1_5"
                && item.dataset_id == "dataset_1_1"
                && item.updated_at == Some(fixture_timestamp())
        })
        .times(1)
        .return_once(|_, item| Ok(item.clone()));
    let mut edited = item("elsewhere", "tampered");
    edited.attributes.insert("price".to_owned(), json!(12));

    let updated = service(remote, MockDatasetRepository::new(), remote_selector())
        .update_item("dataset_1_1", "item_dataset_1_1_5", edited)
        .await
        .expect("updated item");
    assert_eq!(updated.attributes.get("price"), Some(&json!(12)));
}

#[rstest]
#[case(DatasetRepositoryError::not_found("dataset_1_1"), ErrorCode::NotFound)]
#[case(
    DatasetRepositoryError::item_not_found("dataset_1_1", "item_x"),
    ErrorCode::NotFound
)]
#[case(DatasetRepositoryError::storage("disk full"), ErrorCode::InternalError)]
#[tokio::test]
async fn local_failures_map_to_domain_codes(
    #[case] failure: DatasetRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut local = MockDatasetRepository::new();
    local
        .expect_update_item()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let error = service(MockDatasetRepository::new(), local, local_selector())
        .update_item("dataset_1_1", "item_x", item("dataset_1_1", "item_x"))
        .await
        .expect_err("local failure surfaces");
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn delete_reports_absence_as_false() {
    let mut local = MockDatasetRepository::new();
    local.expect_delete().times(1).return_once(|_| Ok(false));

    let removed = service(MockDatasetRepository::new(), local, local_selector())
        .delete("missing")
        .await
        .expect("delete");
    assert!(!removed);
}

#[tokio::test]
async fn seeding_skips_datasets_that_already_hold_items() {
    let mut local = MockDatasetRepository::new();
    local.expect_find_by_id().times(1).return_once(|id| {
        let mut existing = dataset(id);
        existing.datas.push(item(id, "item_a"));
        Ok(existing)
    });
    local.expect_update().times(0);

    service(MockDatasetRepository::new(), local, local_selector())
        .seed_local("dataset_1_1", vec![item("dataset_1_1", "data_x_1")])
        .await
        .expect("seeding is a no-op");
}

#[tokio::test]
async fn seeding_writes_items_into_an_empty_dataset() {
    let mut local = MockDatasetRepository::new();
    local
        .expect_find_by_id()
        .times(1)
        .return_once(|id| Ok(dataset(id)));
    local
        .expect_update()
        .withf(|dataset| dataset.datas.len() == 2)
        .times(1)
        .return_once(|dataset| Ok(dataset.clone()));

    service(MockDatasetRepository::new(), local, local_selector())
        .seed_local(
            "dataset_1_1",
            vec![item("dataset_1_1", "data_a_1"), item("dataset_1_1", "data_a_2")],
        )
        .await
        .expect("seeded");
}
