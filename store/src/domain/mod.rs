//! Domain entities, services and ports.
//!
//! Purpose: Define the application, dataset and user entities, and the
//! services that run every operation remote-first with a single local
//! fallback. Adapters live in [`crate::outbound`] and plug in through
//! [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - Application / Dataset / DatasetItem / User — entities and their drafts.
//! - BackendSelector / StorageMode / BackendPair — the mode decision.
//! - ApplicationService / DatasetService — the operations callers use.

pub mod application;
mod application_service;
mod backend_pair;
pub mod backend_selector;
pub mod dataset;
mod dataset_service;
pub mod error;
mod identity;
mod legacy_items;
mod local_ids;
pub mod ports;
mod seeding;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::application::{Application, ApplicationDraft, UnsavedApplication};
pub use self::application_service::ApplicationService;
pub use self::backend_pair::BackendPair;
pub use self::backend_selector::{BACKEND_API_URL_ENV, BackendSelector, StorageMode};
pub use self::dataset::{
    Dataset, DatasetDraft, DatasetItem, DatasetItemDraft, UnsavedDataset, UnsavedDatasetItem,
};
pub use self::dataset_service::DatasetService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{FixedIdentity, IdentityProvider, IdentityResolver};
pub use self::legacy_items::LegacyItems;
pub use self::local_ids::LocalIdGenerator;
pub use self::seeding::SeedTarget;
pub use self::user::{ANONYMOUS_USER_ID, User, UserId, UserValidationError};
