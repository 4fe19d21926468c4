//! User data model.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Identifier of the process-wide anonymous user.
pub const ANONYMOUS_USER_ID: &str = "anonymous";

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must not carry surrounding whitespace"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier.
///
/// Remote backends assign opaque identifiers, so the only constraint is a
/// non-empty value without surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Identifier of the anonymous user.
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_USER_ID.to_owned())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// The acting user.
///
/// ## Invariants
/// - `id` is non-empty.
/// - The anonymous user is a process-wide singleton; see [`User::anonymous`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
}

static ANONYMOUS_USER: OnceLock<User> = OnceLock::new();

impl User {
    /// Shared anonymous user used whenever no authenticated session exists.
    ///
    /// # Examples
    /// ```
    /// use tuna_store::domain::User;
    ///
    /// let guest = User::anonymous();
    /// assert_eq!(guest.id.as_ref(), "anonymous");
    /// assert!(guest.is_anonymous());
    /// assert!(std::ptr::eq(guest, User::anonymous()));
    /// ```
    pub fn anonymous() -> &'static User {
        ANONYMOUS_USER.get_or_init(|| User {
            id: UserId::anonymous(),
            name: "Guest".to_owned(),
            email: None,
            display_name: Some("Guest".to_owned()),
            is_anonymous: Some(true),
        })
    }

    /// Whether this user stands in for an unauthenticated session.
    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous.unwrap_or(false)
    }
}
