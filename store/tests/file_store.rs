//! The durable directory store, alone and under the services.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tuna_store::domain::{ApplicationDraft, DatasetItemDraft};
use tuna_store::domain::ports::{KeyValueStore, StorageKey};
use tuna_store::outbound::local::FileKeyValueStore;

mod support;

use support::{BackendUrl, services};

struct Workspace {
    _temp: TempDir,
    root: Utf8PathBuf,
}

#[fixture]
fn workspace() -> Workspace {
    let temp = tempfile::tempdir().expect("create temp dir");
    let root = Utf8Path::from_path(temp.path())
        .expect("temp dir path is UTF-8")
        .join("store");
    Workspace { _temp: temp, root }
}

#[rstest]
#[tokio::test]
async fn records_survive_reopening(workspace: Workspace) {
    let key = StorageKey::applications();
    {
        let store = FileKeyValueStore::open(&workspace.root).expect("open store");
        store.set(&key, "[]").await.expect("write record");
        store.set(&key, "[1]").await.expect("overwrite record");
    }

    let reopened = FileKeyValueStore::open(&workspace.root).expect("reopen store");
    assert_eq!(
        reopened.get(&key).await.expect("read record").as_deref(),
        Some("[1]")
    );
    assert!(workspace.root.join("tuna_apps.json").is_file());
}

#[rstest]
#[tokio::test]
async fn prefix_scan_ignores_foreign_files(workspace: Workspace) {
    let store = FileKeyValueStore::open(&workspace.root).expect("open store");
    let first = StorageKey::dataset("dataset_1_1");
    let second = StorageKey::dataset("dataset_2_2");
    store.set(&first, "{}").await.expect("write first");
    store.set(&second, "{}").await.expect("write second");
    store
        .set(&StorageKey::applications(), "[]")
        .await
        .expect("write applications");
    std::fs::write(workspace.root.join("notes.txt"), "hello").expect("write foreign file");

    let keys = store
        .keys_with_prefix("tuna_dataset_")
        .await
        .expect("scan keys");
    assert_eq!(keys, vec![first.clone(), second]);

    assert!(store.remove(&first).await.expect("remove"));
    assert!(!store.remove(&first).await.expect("remove again"));
    assert_eq!(store.get(&first).await.expect("read removed"), None);
}

#[rstest]
#[tokio::test]
async fn services_over_the_file_store_persist_across_runs(workspace: Workspace) {
    let created = {
        let store = Arc::new(FileKeyValueStore::open(&workspace.root).expect("open store"));
        let services = services(store, &BackendUrl::default());
        services
            .applications
            .create(ApplicationDraft::new("午饭").with_tags(["面"]))
            .await
            .expect("create application")
    };

    let store = Arc::new(FileKeyValueStore::open(&workspace.root).expect("reopen store"));
    let services = services(store, &BackendUrl::default());
    let listed = services
        .applications
        .list_for_current_user()
        .await
        .expect("list applications");
    assert_eq!(listed, vec![created.clone()]);

    let dataset_id = created.dataset_id.expect("linked dataset");
    let items = services.datasets.items(&dataset_id).await.expect("items");
    assert_eq!(items.len(), 10);
    assert!(items.iter().all(|item| item.tags == vec!["面".to_owned()]));
}

#[rstest]
#[tokio::test]
async fn opaque_ids_persist_and_outlast_a_failing_backend(workspace: Workspace) {
    let url = BackendUrl::default();
    {
        let store = Arc::new(FileKeyValueStore::open(&workspace.root).expect("open store"));
        let services = services(store, &url);
        let seeded = services
            .applications
            .application_dataset("app:42")
            .await
            .expect("legacy items for an opaque id");
        assert_eq!(seeded.len(), 10);
        services
            .applications
            .add_dataset_item("app:42", DatasetItemDraft::new("牛肉面"))
            .await
            .expect("add legacy item");
    }
    assert!(workspace.root.join("tuna_app_data_app%3A42.json").is_file());

    // Nothing listens on port 9; every remote call fails and falls back.
    url.set(Some("http://127.0.0.1:9".to_owned()));
    let store = Arc::new(FileKeyValueStore::open(&workspace.root).expect("reopen store"));
    let services = services(store, &url);
    let items = services
        .applications
        .application_dataset("app:42")
        .await
        .expect("legacy items after reopening");
    assert_eq!(items.len(), 11);
    assert!(items.iter().any(|item| item.name == "牛肉面"));
}
