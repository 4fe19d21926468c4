//! REST adapters.
//!
//! Each repository is a thin translator over [`RemoteClient`]; 404 answers
//! become the port's not-found variants and every other failure surfaces as
//! an error the domain services treat as a cue to fall back locally.

mod application_repository;
mod client;
mod dataset_repository;
mod user_directory;

pub use application_repository::HttpApplicationRepository;
pub use client::RemoteClient;
pub use dataset_repository::HttpDatasetRepository;
pub use user_directory::HttpUserDirectory;
