//! Assembly of the services from a key/value store, an environment and a
//! clock.
//!
//! Every port gets a remote adapter and a local adapter; the
//! [`BackendSelector`] decides per call which one is offered first.

use std::sync::Arc;

use mockable::{Clock, Env};

use crate::config::StoreSettings;
use crate::domain::ports::{
    ApplicationRepository, DatasetRepository, KeyValueStore, LegacyItemStore, UserDirectory,
};
use crate::domain::{
    ApplicationService, BackendPair, BackendSelector, DatasetService, IdentityProvider,
    IdentityResolver, LegacyItems, LocalIdGenerator,
};
use crate::outbound::http::{
    HttpApplicationRepository, HttpDatasetRepository, HttpUserDirectory, RemoteClient,
};
use crate::outbound::local::{
    LocalApplicationRepository, LocalDatasetRepository, LocalLegacyItemStore,
};

/// Failures while assembling [`Services`].
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    /// The reqwest client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The ready-to-use service bundle.
#[derive(Clone)]
pub struct Services {
    pub applications: ApplicationService,
    pub datasets: DatasetService,
    pub identity: Arc<dyn IdentityProvider>,
    pub selector: BackendSelector,
}

/// Wire remote and local adapters for every port.
///
/// `store` backs all local records; `env` is consulted for
/// `TUNA_BACKEND_API_URL` on every call.
///
/// # Errors
///
/// Returns [`WiringError::HttpClient`] when the reqwest client cannot be
/// constructed.
pub fn build_services(
    store: Arc<dyn KeyValueStore>,
    env: Arc<dyn Env + Send + Sync>,
    clock: Arc<dyn Clock>,
    settings: &StoreSettings,
) -> Result<Services, WiringError> {
    let selector = BackendSelector::new(env);
    let client = RemoteClient::new(selector.clone(), settings.request_timeout())?;
    let ids = LocalIdGenerator::new(Arc::clone(&clock));

    let directory: Arc<dyn UserDirectory> = Arc::new(HttpUserDirectory::new(client.clone()));
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(IdentityResolver::new(directory, selector.clone()));

    let remote_datasets: Arc<dyn DatasetRepository> =
        Arc::new(HttpDatasetRepository::new(client.clone()));
    let local_datasets: Arc<dyn DatasetRepository> = Arc::new(LocalDatasetRepository::new(
        Arc::clone(&store),
        ids.clone(),
    ));
    let datasets = DatasetService::new(
        BackendPair::new(remote_datasets, local_datasets, selector.clone()),
        Arc::clone(&identity),
        Arc::clone(&clock),
    );

    let remote_applications: Arc<dyn ApplicationRepository> =
        Arc::new(HttpApplicationRepository::new(client));
    let local_applications: Arc<dyn ApplicationRepository> =
        Arc::new(LocalApplicationRepository::new(Arc::clone(&store), ids));
    let legacy_store: Arc<dyn LegacyItemStore> = Arc::new(LocalLegacyItemStore::new(store));
    let applications = ApplicationService::new(
        BackendPair::new(remote_applications, local_applications, selector.clone()),
        datasets.clone(),
        LegacyItems::new(legacy_store, Arc::clone(&clock)),
        Arc::clone(&identity),
        clock,
    )
    .with_mock_item_count(settings.mock_item_count());

    Ok(Services {
        applications,
        datasets,
        identity,
        selector,
    })
}
