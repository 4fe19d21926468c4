//! Port abstraction for looking up the signed-in user.
use async_trait::async_trait;

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// The directory could not be reached or is not configured.
        Unavailable { message: String } => "user directory unavailable: {message}",
        /// The directory answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "user directory rejected the request with status {status}: {message}",
        /// The user payload could not be decoded.
        Decode { message: String } => "user payload could not be decoded: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve the user behind the current session.
    async fn current_user(&self) -> Result<User, UserDirectoryError>;
}
