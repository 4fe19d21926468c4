//! Application operations under the remote-first, local-fallback policy.
//!
//! Creation pairs each application with a companion dataset on a best-effort
//! basis. The item passthroughs keyed by application id route to that
//! dataset when one is linked, and otherwise (or when the dataset path fails)
//! to the application-scoped legacy lists.

use std::sync::Arc;

use mock_data::DEFAULT_ITEM_COUNT;
use mockable::Clock;
use serde_json::json;
use tracing::warn;

use super::backend_pair::log_fallback;
use super::ports::{ApplicationRepository, ApplicationRepositoryError};
use super::seeding::{SeedTarget, synthesize_items};
use super::{
    Application, ApplicationDraft, BackendPair, DatasetDraft, DatasetItem, DatasetItemDraft,
    DatasetService, Error, IdentityProvider, LegacyItems, StorageMode, UnsavedApplication, UserId,
};

/// Application service.
#[derive(Clone)]
pub struct ApplicationService {
    applications: BackendPair<dyn ApplicationRepository>,
    datasets: DatasetService,
    legacy: LegacyItems,
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
    mock_item_count: usize,
}

impl ApplicationService {
    pub fn new(
        applications: BackendPair<dyn ApplicationRepository>,
        datasets: DatasetService,
        legacy: LegacyItems,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            applications,
            datasets,
            legacy,
            identity,
            clock,
            mock_item_count: DEFAULT_ITEM_COUNT,
        }
    }

    /// Number of mock items seeded into new local item collections.
    pub fn with_mock_item_count(mut self, count: usize) -> Self {
        self.mock_item_count = count;
        self.legacy = self.legacy.with_item_count(count);
        self
    }

    /// Applications of the acting user.
    ///
    /// The local store holds a single flat list and is not filtered by user.
    pub async fn list_for_current_user(&self) -> Result<Vec<Application>, Error> {
        let user = self.identity.current_user().await;
        self.list_by_user(&user.id).await
    }

    /// Applications created by `user_id` (remote), or every stored
    /// application (local).
    pub async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Application>, Error> {
        if let Some(remote) = self.applications.remote() {
            match remote.list_by_user(user_id).await {
                Ok(applications) => return Ok(applications),
                Err(error) => log_fallback("list_applications", &error),
            }
        }
        self.applications
            .local()
            .list_by_user(user_id)
            .await
            .map_err(application_error)
    }

    /// Create an application together with its companion dataset.
    ///
    /// A failure to create the dataset does not fail the application; it is
    /// created without a `datasetId`. When the dataset lands in the local
    /// store it is seeded with mock items for the new application.
    pub async fn create(&self, draft: ApplicationDraft) -> Result<Application, Error> {
        let user = self.identity.current_user().await;
        let now = self.clock.utc();

        let companion = DatasetDraft {
            name: draft.name.clone(),
            description: None,
            tags: draft.tags.clone(),
        };
        let dataset = match self.datasets.create_reporting_mode(companion).await {
            Ok(created) => Some(created),
            Err(error) => {
                warn!(error = %error, "companion dataset creation failed; creating application unlinked");
                None
            }
        };

        let dataset_id = dataset.as_ref().map(|(dataset, _)| dataset.id.clone());
        let unsaved = UnsavedApplication::from_draft(draft, user.id, now, dataset_id);
        let application = self.create_record(&unsaved).await?;

        if let Some((dataset, StorageMode::Local)) = dataset {
            self.seed_companion(&application, &dataset.id).await;
        }
        Ok(application)
    }

    /// Fetch an application by id.
    pub async fn get_by_id(&self, id: &str) -> Result<Application, Error> {
        if let Some(remote) = self.applications.remote() {
            match remote.find_by_id(id).await {
                Ok(application) => return Ok(application),
                Err(error) => log_fallback("get_application", &error),
            }
        }
        self.applications
            .local()
            .find_by_id(id)
            .await
            .map_err(application_error)
    }

    /// Replace an application, stamping `updatedAt`.
    pub async fn update(&self, mut application: Application) -> Result<Application, Error> {
        application.updated_at = self.clock.utc();

        if let Some(remote) = self.applications.remote() {
            match remote.update(&application).await {
                Ok(updated) => return Ok(updated),
                Err(error) => log_fallback("update_application", &error),
            }
        }
        self.applications
            .local()
            .update(&application)
            .await
            .map_err(application_error)
    }

    /// Delete an application; `false` when it did not exist.
    pub async fn delete(&self, id: &str) -> Result<bool, Error> {
        if let Some(remote) = self.applications.remote() {
            match remote.delete(id).await {
                Ok(removed) => return Ok(removed),
                Err(error) => log_fallback("delete_application", &error),
            }
        }
        self.applications
            .local()
            .delete(id)
            .await
            .map_err(application_error)
    }

    /// Items shown for an application.
    pub async fn application_dataset(&self, application_id: &str) -> Result<Vec<DatasetItem>, Error> {
        let application = self.resolve(application_id).await;
        if let Some(dataset_id) = linked_dataset(application.as_ref()) {
            match self.datasets.get_by_id(dataset_id).await {
                Ok(dataset) => return Ok(dataset.datas),
                Err(error) => log_legacy_reroute("application_dataset", application_id, &error),
            }
        }
        self.legacy
            .list(SeedTarget::resolve(application_id, application.as_ref()))
            .await
    }

    /// Add an item to an application's items.
    pub async fn add_dataset_item(
        &self,
        application_id: &str,
        draft: DatasetItemDraft,
    ) -> Result<DatasetItem, Error> {
        let application = self.resolve(application_id).await;
        if let Some(dataset_id) = linked_dataset(application.as_ref()) {
            match self.datasets.add_item(dataset_id, draft.clone()).await {
                Ok(item) => return Ok(item),
                Err(error) => log_legacy_reroute("add_dataset_item", application_id, &error),
            }
        }
        self.legacy
            .add(SeedTarget::resolve(application_id, application.as_ref()), draft)
            .await
    }

    /// Replace one of an application's items.
    pub async fn update_dataset_item(
        &self,
        application_id: &str,
        item_id: &str,
        item: DatasetItem,
    ) -> Result<DatasetItem, Error> {
        let application = self.resolve(application_id).await;
        if let Some(dataset_id) = linked_dataset(application.as_ref()) {
            match self
                .datasets
                .update_item(dataset_id, item_id, item.clone())
                .await
            {
                Ok(updated) => return Ok(updated),
                Err(error) => log_legacy_reroute("update_dataset_item", application_id, &error),
            }
        }
        self.legacy
            .update(
                SeedTarget::resolve(application_id, application.as_ref()),
                item_id,
                item,
            )
            .await
    }

    /// Remove one of an application's items; `false` when it did not exist.
    pub async fn delete_dataset_item(
        &self,
        application_id: &str,
        item_id: &str,
    ) -> Result<bool, Error> {
        let application = self.resolve(application_id).await;
        if let Some(dataset_id) = linked_dataset(application.as_ref()) {
            match self.datasets.delete_item(dataset_id, item_id).await {
                Ok(removed) => return Ok(removed),
                Err(error) => log_legacy_reroute("delete_dataset_item", application_id, &error),
            }
        }
        self.legacy
            .delete(SeedTarget::resolve(application_id, application.as_ref()), item_id)
            .await
    }

    async fn create_record(&self, unsaved: &UnsavedApplication) -> Result<Application, Error> {
        if let Some(remote) = self.applications.remote() {
            match remote.create(unsaved).await {
                Ok(application) => return Ok(application),
                Err(error) => log_fallback("create_application", &error),
            }
        }
        self.applications
            .local()
            .create(unsaved)
            .await
            .map_err(application_error)
    }

    async fn seed_companion(&self, application: &Application, dataset_id: &str) {
        let items = match synthesize_items(
            SeedTarget::new(application),
            dataset_id,
            self.mock_item_count,
            self.clock.utc(),
        ) {
            Ok(items) => items,
            Err(error) => {
                warn!(application_id = %application.id, error = %error, "mock seeding failed");
                return;
            }
        };
        if let Err(error) = self.datasets.seed_local(dataset_id, items).await {
            warn!(
                application_id = %application.id,
                dataset_id,
                error = %error,
                "companion dataset could not be seeded"
            );
        }
    }

    async fn resolve(&self, application_id: &str) -> Option<Application> {
        match self.get_by_id(application_id).await {
            Ok(application) => Some(application),
            Err(error) => {
                warn!(application_id, error = %error, "application lookup failed; using legacy items");
                None
            }
        }
    }
}

fn linked_dataset(application: Option<&Application>) -> Option<&str> {
    application.and_then(|application| application.dataset_id.as_deref())
}

fn log_legacy_reroute(operation: &'static str, application_id: &str, error: &Error) {
    warn!(
        operation,
        application_id,
        error = %error,
        "linked dataset unavailable; using legacy items"
    );
}

pub(crate) fn application_error(error: ApplicationRepositoryError) -> Error {
    match error {
        ApplicationRepositoryError::NotFound { id } => {
            Error::not_found(format!("application {id} not found"))
                .with_details(json!({ "applicationId": id }))
        }
        other => Error::internal(other.to_string()),
    }
}

#[cfg(test)]
#[path = "application_service_tests.rs"]
mod tests;
