//! REST adapter for `/api/datasets` and their nested items.

use async_trait::async_trait;
use reqwest::Method;

use super::client::{RemoteCallError, RemoteClient};
use crate::domain::ports::{DatasetRepository, DatasetRepositoryError};
use crate::domain::{Dataset, DatasetItem, UnsavedDataset, UnsavedDatasetItem};

const API: &str = "api";
const DATASETS: &str = "datasets";
const ITEMS: &str = "items";

/// What a failed call was addressing, for 404 mapping.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Collection,
    Dataset(&'a str),
    Item { dataset_id: &'a str, item_id: &'a str },
}

/// Dataset repository served by the REST backend.
#[derive(Debug, Clone)]
pub struct HttpDatasetRepository {
    client: RemoteClient,
}

impl HttpDatasetRepository {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DatasetRepository for HttpDatasetRepository {
    async fn list(&self) -> Result<Vec<Dataset>, DatasetRepositoryError> {
        self.client
            .get(&[API, DATASETS], &[])
            .await
            .map_err(|error| map_call_error(Target::Collection, error))
    }

    async fn find_by_id(&self, id: &str) -> Result<Dataset, DatasetRepositoryError> {
        self.client
            .get(&[API, DATASETS, id], &[])
            .await
            .map_err(|error| map_call_error(Target::Dataset(id), error))
    }

    async fn create(&self, dataset: &UnsavedDataset) -> Result<Dataset, DatasetRepositoryError> {
        self.client
            .send(Method::POST, &[API, DATASETS], dataset)
            .await
            .map_err(|error| map_call_error(Target::Collection, error))
    }

    async fn update(&self, dataset: &Dataset) -> Result<Dataset, DatasetRepositoryError> {
        let id = dataset.id.as_str();
        self.client
            .send(Method::PUT, &[API, DATASETS, id], dataset)
            .await
            .map_err(|error| map_call_error(Target::Dataset(id), error))
    }

    async fn delete(&self, id: &str) -> Result<bool, DatasetRepositoryError> {
        self.client
            .delete(&[API, DATASETS, id])
            .await
            .map_err(|error| map_call_error(Target::Dataset(id), error))
    }

    async fn list_items(&self, dataset_id: &str) -> Result<Vec<DatasetItem>, DatasetRepositoryError> {
        self.client
            .get(&[API, DATASETS, dataset_id, ITEMS], &[])
            .await
            .map_err(|error| map_call_error(Target::Dataset(dataset_id), error))
    }

    async fn add_item(
        &self,
        dataset_id: &str,
        item: &UnsavedDatasetItem,
    ) -> Result<DatasetItem, DatasetRepositoryError> {
        self.client
            .send(Method::POST, &[API, DATASETS, dataset_id, ITEMS], item)
            .await
            .map_err(|error| map_call_error(Target::Dataset(dataset_id), error))
    }

    async fn update_item(
        &self,
        dataset_id: &str,
        item: &DatasetItem,
    ) -> Result<DatasetItem, DatasetRepositoryError> {
        let item_id = item.id.as_str();
        self.client
            .send(Method::PUT, &[API, DATASETS, dataset_id, ITEMS, item_id], item)
            .await
            .map_err(|error| map_call_error(Target::Item { dataset_id, item_id }, error))
    }

    async fn delete_item(
        &self,
        dataset_id: &str,
        item_id: &str,
    ) -> Result<bool, DatasetRepositoryError> {
        self.client
            .delete(&[API, DATASETS, dataset_id, ITEMS, item_id])
            .await
            .map_err(|error| map_call_error(Target::Item { dataset_id, item_id }, error))
    }
}

fn map_call_error(target: Target<'_>, error: RemoteCallError) -> DatasetRepositoryError {
    match error {
        RemoteCallError::NotFound => match target {
            Target::Collection => DatasetRepositoryError::rejected(404_u16, "collection not found"),
            Target::Dataset(id) => DatasetRepositoryError::not_found(id),
            Target::Item {
                dataset_id,
                item_id,
            } => DatasetRepositoryError::item_not_found(dataset_id, item_id),
        },
        RemoteCallError::Status { status, message } => {
            DatasetRepositoryError::rejected(status, message)
        }
        RemoteCallError::Decode { message } => DatasetRepositoryError::decode(message),
        other => DatasetRepositoryError::unavailable(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    //! Round trips against a mock backend.

    use std::time::Duration;

    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::DatasetItemDraft;
    use crate::domain::test_support::{fixture_timestamp, selector_at};

    fn repository(server: &MockServer) -> HttpDatasetRepository {
        let client = RemoteClient::new(selector_at(server.uri()), Duration::from_secs(5))
            .expect("client should build");
        HttpDatasetRepository::new(client)
    }

    fn item_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "datasetId": "d1",
            "name": "面",
            "tags": [],
            "createdAt": "2025-03-01T12:00:00Z",
            "spicy": true
        })
    }

    #[rstest]
    #[tokio::test]
    async fn fetches_a_dataset_with_embedded_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/datasets/d1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "d1",
                "name": "午饭",
                "datas": [item_json("i1")]
            })))
            .mount(&server)
            .await;

        let dataset = repository(&server).find_by_id("d1").await.expect("dataset");
        assert_eq!(dataset.datas.len(), 1);
        assert_eq!(dataset.datas[0].attributes.get("spicy"), Some(&json!(true)));
    }

    #[rstest]
    #[tokio::test]
    async fn posts_items_to_the_nested_collection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/datasets/d1/items"))
            .and(body_partial_json(json!({ "datasetId": "d1", "name": "面" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(item_json("srv-item")))
            .expect(1)
            .mount(&server)
            .await;

        let unsaved =
            UnsavedDatasetItem::from_draft("d1", DatasetItemDraft::new("面"), fixture_timestamp());
        let item = repository(&server)
            .add_item("d1", &unsaved)
            .await
            .expect("add item");
        assert_eq!(item.id, "srv-item");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_item_maps_to_item_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/datasets/d1/items/i9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let error = repository(&server)
            .delete_item("d1", "i9")
            .await
            .expect_err("missing item");
        assert_eq!(error, DatasetRepositoryError::item_not_found("d1", "i9"));
    }

    #[rstest]
    #[tokio::test]
    async fn successful_delete_reports_removal() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/datasets/d1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        assert!(repository(&server).delete("d1").await.expect("delete"));
    }

    #[rstest]
    #[case::dataset(Target::Dataset("d1"), DatasetRepositoryError::not_found("d1"))]
    #[case::collection(
        Target::Collection,
        DatasetRepositoryError::rejected(404_u16, "collection not found")
    )]
    fn not_found_depends_on_the_target(
        #[case] target: Target<'static>,
        #[case] expected: DatasetRepositoryError,
    ) {
        assert_eq!(map_call_error(target, RemoteCallError::NotFound), expected);
    }

    #[rstest]
    fn transport_failures_are_unavailable() {
        let error = map_call_error(
            Target::Collection,
            RemoteCallError::Transport {
                message: "connection refused".to_owned(),
            },
        );
        assert!(
            matches!(error, DatasetRepositoryError::Unavailable { .. }),
            "unexpected error: {error:?}"
        );
    }
}
