//! REST adapter for `/api/applications`.

use async_trait::async_trait;
use reqwest::Method;

use super::client::{RemoteCallError, RemoteClient};
use crate::domain::ports::{ApplicationRepository, ApplicationRepositoryError};
use crate::domain::{Application, UnsavedApplication, UserId};

const API: &str = "api";
const APPLICATIONS: &str = "applications";

/// Application repository served by the REST backend.
#[derive(Debug, Clone)]
pub struct HttpApplicationRepository {
    client: RemoteClient,
}

impl HttpApplicationRepository {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApplicationRepository for HttpApplicationRepository {
    async fn list_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        self.client
            .get(&[API, APPLICATIONS], &[("userId", user_id.as_ref())])
            .await
            .map_err(|error| map_call_error(None, error))
    }

    async fn create(
        &self,
        application: &UnsavedApplication,
    ) -> Result<Application, ApplicationRepositoryError> {
        self.client
            .send(Method::POST, &[API, APPLICATIONS], application)
            .await
            .map_err(|error| map_call_error(None, error))
    }

    async fn find_by_id(&self, id: &str) -> Result<Application, ApplicationRepositoryError> {
        self.client
            .get(&[API, APPLICATIONS, id], &[])
            .await
            .map_err(|error| map_call_error(Some(id), error))
    }

    async fn update(
        &self,
        application: &Application,
    ) -> Result<Application, ApplicationRepositoryError> {
        let id = application.id.as_str();
        self.client
            .send(Method::PUT, &[API, APPLICATIONS, id], application)
            .await
            .map_err(|error| map_call_error(Some(id), error))
    }

    async fn delete(&self, id: &str) -> Result<bool, ApplicationRepositoryError> {
        self.client
            .delete(&[API, APPLICATIONS, id])
            .await
            .map_err(|error| map_call_error(Some(id), error))
    }
}

fn map_call_error(id: Option<&str>, error: RemoteCallError) -> ApplicationRepositoryError {
    match (error, id) {
        (RemoteCallError::NotFound, Some(id)) => ApplicationRepositoryError::not_found(id),
        (RemoteCallError::NotFound, None) => {
            ApplicationRepositoryError::rejected(404_u16, "collection not found")
        }
        (RemoteCallError::Status { status, message }, _) => {
            ApplicationRepositoryError::rejected(status, message)
        }
        (RemoteCallError::Decode { message }, _) => ApplicationRepositoryError::decode(message),
        (other, _) => ApplicationRepositoryError::unavailable(other.to_string()),
    }
}
