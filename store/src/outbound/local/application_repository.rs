//! Local application list stored under `tuna_apps`.
//!
//! The list is flat and unscoped: every stored application is visible to
//! every user. New applications are prepended, so the list reads newest
//! first.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::records::{Stored, read_json, write_json};
use crate::domain::ports::{
    ApplicationRepository, ApplicationRepositoryError, KeyValueStore, KeyValueStoreError,
    StorageKey,
};
use crate::domain::{Application, LocalIdGenerator, UnsavedApplication, UserId};

/// [`ApplicationRepository`] over a [`KeyValueStore`].
#[derive(Clone)]
pub struct LocalApplicationRepository {
    store: Arc<dyn KeyValueStore>,
    ids: LocalIdGenerator,
}

impl LocalApplicationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, ids: LocalIdGenerator) -> Self {
        Self { store, ids }
    }

    async fn load(&self) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let stored = read_json(self.store.as_ref(), &StorageKey::applications())
            .await
            .map_err(storage_error)?;
        Ok(match stored {
            Stored::Present(applications) => applications,
            Stored::Missing | Stored::Corrupt => Vec::new(),
        })
    }

    async fn save(&self, applications: &[Application]) -> Result<(), ApplicationRepositoryError> {
        write_json(self.store.as_ref(), &StorageKey::applications(), applications)
            .await
            .map_err(storage_error)
    }
}

#[async_trait]
impl ApplicationRepository for LocalApplicationRepository {
    async fn list_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        debug!(user_id = %user_id, "local application list is not scoped by user");
        self.load().await
    }

    async fn create(
        &self,
        application: &UnsavedApplication,
    ) -> Result<Application, ApplicationRepositoryError> {
        let mut applications = self.load().await?;
        let id = self.ids.application_id(|candidate| {
            applications.iter().any(|existing| existing.id == candidate)
        });
        let created = Application::from_unsaved(id, application.clone());
        applications.insert(0, created.clone());
        self.save(&applications).await?;
        debug!(application_id = %created.id, "created local application");
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Application, ApplicationRepositoryError> {
        self.load()
            .await?
            .into_iter()
            .find(|application| application.id == id)
            .ok_or_else(|| ApplicationRepositoryError::not_found(id))
    }

    async fn update(
        &self,
        application: &Application,
    ) -> Result<Application, ApplicationRepositoryError> {
        let mut applications = self.load().await?;
        let slot = applications
            .iter_mut()
            .find(|existing| existing.id == application.id)
            .ok_or_else(|| ApplicationRepositoryError::not_found(application.id.as_str()))?;
        *slot = application.clone();
        self.save(&applications).await?;
        Ok(application.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, ApplicationRepositoryError> {
        let mut applications = self.load().await?;
        let before = applications.len();
        applications.retain(|application| application.id != id);
        if applications.len() == before {
            return Ok(false);
        }
        self.save(&applications).await?;
        Ok(true)
    }
}

fn storage_error(error: KeyValueStoreError) -> ApplicationRepositoryError {
    ApplicationRepositoryError::storage(error.to_string())
}
