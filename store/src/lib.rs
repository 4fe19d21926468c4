//! Dual-mode persistence for lucky wheel applications.
//!
//! Every create/read/update/delete on applications, datasets and dataset
//! items prefers the REST backend named by `TUNA_BACKEND_API_URL` and falls
//! back to an on-device key/value store when the backend is unconfigured or
//! fails. Callers never see the remote failure.
//!
//! The crate is laid out as a hexagon:
//!
//! - [`domain`] holds the entities, the services that apply the
//!   remote-first policy, and the [`domain::ports`] they talk through.
//! - [`outbound`] holds the reqwest adapters and the local key/value
//!   adapters implementing those ports.
//! - [`wiring`] assembles a ready-to-use [`wiring::Services`] bundle.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod wiring;

pub use config::StoreSettings;
pub use wiring::{Services, WiringError, build_services};
