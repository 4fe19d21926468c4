//! Store configuration loaded via OrthoConfig.
//!
//! The backend base URL is deliberately absent: it is read from
//! `TUNA_BACKEND_API_URL` on every call by
//! [`BackendSelector`](crate::domain::BackendSelector), not once at load time.

use std::path::PathBuf;
use std::time::Duration;

use mock_data::DEFAULT_ITEM_COUNT;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_DATA_DIR: &str = ".tuna";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Settings for the local store and the REST client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TUNA")]
pub struct StoreSettings {
    /// Directory holding the durable local records.
    pub data_dir: Option<PathBuf>,
    /// Number of mock items seeded into new local item collections.
    #[ortho_config(default = 10)]
    pub mock_item_count: usize,
    /// Per-request timeout for backend calls, in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            mock_item_count: DEFAULT_ITEM_COUNT,
            request_timeout_secs: None,
        }
    }
}

impl StoreSettings {
    /// Return the configured data directory, falling back to `./.tuna`.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub const fn mock_item_count(&self) -> usize {
        self.mock_item_count
    }

    /// Return the request timeout; zero is raised to one second.
    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
            .max(1);
        Duration::from_secs(secs)
    }
}
