//! Resolution of the acting user for write paths.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ports::UserDirectory;
use super::{BackendSelector, User};

/// Supplies the user on whose behalf a write is performed.
///
/// Resolution never fails: without a session the anonymous user acts.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> User;
}

/// Asks the user directory when a backend is configured, otherwise (or on
/// any directory failure) falls back to [`User::anonymous`].
#[derive(Clone)]
pub struct IdentityResolver {
    directory: Arc<dyn UserDirectory>,
    selector: BackendSelector,
}

impl IdentityResolver {
    pub fn new(directory: Arc<dyn UserDirectory>, selector: BackendSelector) -> Self {
        Self {
            directory,
            selector,
        }
    }
}

#[async_trait]
impl IdentityProvider for IdentityResolver {
    async fn current_user(&self) -> User {
        if !self.selector.is_backend_available() {
            return User::anonymous().clone();
        }
        match self.directory.current_user().await {
            Ok(user) => {
                debug!(user_id = %user.id, "resolved current user");
                user
            }
            Err(error) => {
                warn!(error = %error, "user lookup failed; acting as anonymous");
                User::anonymous().clone()
            }
        }
    }
}

/// Provider that always answers with the same user.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub User);

impl FixedIdentity {
    pub fn anonymous() -> Self {
        Self(User::anonymous().clone())
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_user(&self) -> User {
        self.0.clone()
    }
}
