//! Remote-first behaviour against a mock backend, and the single local
//! fallback when it fails.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;
use tuna_store::domain::ports::KeyValueStore;
use tuna_store::domain::{ApplicationDraft, ErrorCode, StorageMode};
use tuna_store::outbound::local::InMemoryKeyValueStore;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;

use support::{BackendUrl, services};

fn application_json(id: &str, dataset_id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "午饭",
        "tags": [],
        "createdBy": "user1",
        "createdAt": "2025-03-01T12:00:00Z",
        "updatedAt": "2025-03-01T12:00:00Z",
        "datasetId": dataset_id
    })
}

fn backend_at(url: impl Into<String>) -> BackendUrl {
    let backend = BackendUrl::default();
    backend.set(Some(url.into()));
    backend
}

async fn local_record_count(store: &InMemoryKeyValueStore) -> usize {
    store
        .keys_with_prefix("tuna_")
        .await
        .expect("list local keys")
        .len()
}

async fn mount_current_user(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/users/current"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "user1", "name": "User One" })),
        )
        .mount(server)
        .await;
}

#[rstest]
#[tokio::test]
async fn remote_answers_are_returned_without_touching_local() {
    let server = MockServer::start().await;
    mount_current_user(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/applications"))
        .and(query_param("userId", "user1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([application_json("a1", "d1")])))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryKeyValueStore::new());
    let services = services(store.clone(), &backend_at(server.uri()));
    assert_eq!(services.selector.mode(), StorageMode::Remote);

    let listed = services
        .applications
        .list_for_current_user()
        .await
        .expect("list applications");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "a1");
    assert_eq!(local_record_count(&store).await, 0);
}

#[rstest]
#[tokio::test]
async fn remote_creation_links_the_remote_dataset() {
    let server = MockServer::start().await;
    mount_current_user(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/datasets"))
        .and(body_partial_json(json!({ "name": "午饭", "createdBy": "user1" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "ds-remote", "name": "午饭" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/applications"))
        .and(body_partial_json(json!({ "name": "午饭", "datasetId": "ds-remote" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(application_json("srv-app", "ds-remote")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryKeyValueStore::new());
    let services = services(store.clone(), &backend_at(server.uri()));

    let created = services
        .applications
        .create(ApplicationDraft::new("午饭"))
        .await
        .expect("create application");
    assert_eq!(created.id, "srv-app");
    assert_eq!(created.dataset_id.as_deref(), Some("ds-remote"));
    assert_eq!(local_record_count(&store).await, 0);
}

#[rstest]
#[case::server_error(500)]
#[case::unavailable(503)]
#[tokio::test]
async fn server_errors_fall_back_to_a_seeded_local_application(#[case] status: u16) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryKeyValueStore::new());
    let services = services(store.clone(), &backend_at(server.uri()));

    let created = services
        .applications
        .create(ApplicationDraft::new("午饭"))
        .await
        .expect("create falls back locally");
    assert!(created.id.starts_with("local_"), "id {}", created.id);
    assert!(created.created_by.as_ref() == "anonymous");
    let dataset_id = created.dataset_id.clone().expect("local dataset linked");
    assert!(dataset_id.starts_with("dataset_"));

    let items = services
        .datasets
        .items(&dataset_id)
        .await
        .expect("items fall back locally");
    assert_eq!(items.len(), 10);
}

#[rstest]
#[tokio::test]
async fn not_found_remotely_reads_the_local_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/applications/local_missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = BackendUrl::default();
    let services = services(Arc::new(InMemoryKeyValueStore::new()), &url);
    let created = services
        .applications
        .create(ApplicationDraft::new("午饭"))
        .await
        .expect("create locally");

    url.set(Some(server.uri()));
    assert_eq!(services.selector.mode(), StorageMode::Remote);

    let found = services
        .applications
        .get_by_id(&created.id)
        .await
        .expect("local record served after remote 404");
    assert_eq!(found, created);

    let error = services
        .applications
        .get_by_id("local_missing")
        .await
        .expect_err("absent everywhere");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn unreachable_backend_falls_back() {
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);

    let services = services(
        Arc::new(InMemoryKeyValueStore::new()),
        &backend_at(uri),
    );
    let created = services
        .applications
        .create(ApplicationDraft::new("午饭"))
        .await
        .expect("create falls back locally");
    assert!(created.id.starts_with("local_"));
}

#[rstest]
#[tokio::test]
async fn malformed_backend_url_counts_as_configured_but_falls_back() {
    let services = services(
        Arc::new(InMemoryKeyValueStore::new()),
        &backend_at("not a url"),
    );
    assert_eq!(services.selector.mode(), StorageMode::Remote);

    let created = services
        .applications
        .create(ApplicationDraft::new("午饭"))
        .await
        .expect("create falls back locally");
    assert!(created.id.starts_with("local_"));
    assert_eq!(
        services
            .applications
            .list_for_current_user()
            .await
            .expect("list falls back locally"),
        vec![created]
    );
}
