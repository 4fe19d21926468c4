//! Outbound adapters implementing the domain ports.
//!
//! - **http**: reqwest-backed repositories talking to the REST backend.
//! - **local**: key/value-backed repositories used when the backend is not
//!   configured or a remote call fails.
//!
//! Adapters translate between domain types and their stored or wire
//! representations. They contain no fallback logic.

pub mod http;
pub mod local;
