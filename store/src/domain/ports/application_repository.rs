//! Port abstraction for application persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Application, UnsavedApplication, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by application repository adapters.
    pub enum ApplicationRepositoryError {
        /// No application with this identifier exists in the adapter's store.
        NotFound { id: String } => "application {id} not found",
        /// The backend could not be reached or is not configured.
        Unavailable { message: String } => "application backend unavailable: {message}",
        /// The backend answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "application backend rejected the request with status {status}: {message}",
        /// A payload could not be decoded.
        Decode { message: String } => "application payload could not be decoded: {message}",
        /// Local storage failed.
        Storage { message: String } => "application storage failed: {message}",
    }
}

/// CRUD over [`Application`] records.
///
/// Remote and local adapters implement the same contract so the service can
/// swap one for the other per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// List applications created by `user_id`.
    ///
    /// Adapters without per-user scoping may return every stored application.
    async fn list_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Application>, ApplicationRepositoryError>;

    /// Persist a new application and return it with its assigned identifier.
    async fn create(
        &self,
        application: &UnsavedApplication,
    ) -> Result<Application, ApplicationRepositoryError>;

    /// Fetch an application by identifier.
    async fn find_by_id(&self, id: &str) -> Result<Application, ApplicationRepositoryError>;

    /// Replace the stored record carrying `application.id`.
    async fn update(
        &self,
        application: &Application,
    ) -> Result<Application, ApplicationRepositoryError>;

    /// Remove an application, reporting whether a record existed.
    async fn delete(&self, id: &str) -> Result<bool, ApplicationRepositoryError>;
}
