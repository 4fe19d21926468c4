//! REST adapter for `/api/users/current`.

use async_trait::async_trait;

use super::client::{RemoteCallError, RemoteClient};
use crate::domain::User;
use crate::domain::ports::{UserDirectory, UserDirectoryError};

/// User directory served by the REST backend.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: RemoteClient,
}

impl HttpUserDirectory {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn current_user(&self) -> Result<User, UserDirectoryError> {
        self.client
            .get(&["api", "users", "current"], &[])
            .await
            .map_err(map_call_error)
    }
}

fn map_call_error(error: RemoteCallError) -> UserDirectoryError {
    match error {
        RemoteCallError::NotFound => UserDirectoryError::rejected(404_u16, "no current user"),
        RemoteCallError::Status { status, message } => UserDirectoryError::rejected(status, message),
        RemoteCallError::Decode { message } => UserDirectoryError::decode(message),
        other => UserDirectoryError::unavailable(other.to_string()),
    }
}
