//! Error types for the mock-data crate.

use thiserror::Error;

/// Errors that can occur while synthesizing mock items.
///
/// Generation itself cannot fail once the request is valid; the only
/// invalid request is one that would produce malformed item identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The application identifier is empty or only whitespace.
    #[error("application id must not be empty")]
    EmptyApplicationId,
}
