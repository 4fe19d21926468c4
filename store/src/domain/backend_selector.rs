//! Remote-versus-local mode selection.
//!
//! The decision is re-derived from the environment on every call so a
//! process (or a test) can flip modes by changing `TUNA_BACKEND_API_URL`.

use std::fmt;
use std::sync::Arc;

use mockable::Env;

/// Environment variable naming the REST backend base URL.
pub const BACKEND_API_URL_ENV: &str = "TUNA_BACKEND_API_URL";

/// Which store serves a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageMode {
    /// The REST backend.
    Remote,
    /// The on-device key/value store.
    Local,
}

impl StorageMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads the backend base URL from the environment on demand.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use mockable::MockEnv;
/// use tuna_store::domain::{BackendSelector, StorageMode};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| Some("http://localhost:8080".to_owned()));
/// let selector = BackendSelector::new(Arc::new(env));
/// assert!(selector.is_backend_available());
/// assert_eq!(selector.mode(), StorageMode::Remote);
/// ```
#[derive(Clone)]
pub struct BackendSelector {
    env: Arc<dyn Env + Send + Sync>,
}

impl BackendSelector {
    pub fn new(env: Arc<dyn Env + Send + Sync>) -> Self {
        Self { env }
    }

    /// Configured base URL, or `None` when unset or blank.
    pub fn backend_api_url(&self) -> Option<String> {
        self.env
            .string(BACKEND_API_URL_ENV)
            .map(|raw| raw.trim().to_owned())
            .filter(|url| !url.is_empty())
    }

    /// Whether a base URL is configured right now. The URL is not
    /// validated here; a malformed value fails at request time.
    pub fn is_backend_available(&self) -> bool {
        self.backend_api_url().is_some()
    }

    pub fn mode(&self) -> StorageMode {
        if self.is_backend_available() {
            StorageMode::Remote
        } else {
            StorageMode::Local
        }
    }
}

impl fmt::Debug for BackendSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSelector")
            .field("mode", &self.mode())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Mode selection from the environment.
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn selector_with(value: Option<&'static str>) -> BackendSelector {
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| match key {
                BACKEND_API_URL_ENV => value.map(str::to_owned),
                _ => None,
            });
        BackendSelector::new(Arc::new(env))
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_or_missing_url_means_local(#[case] value: Option<&'static str>) {
        let selector = selector_with(value);
        assert!(!selector.is_backend_available());
        assert_eq!(selector.backend_api_url(), None);
        assert_eq!(selector.mode(), StorageMode::Local);
    }

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080")]
    #[case(" https://api.example.test/ ", "https://api.example.test/")]
    #[case("not a url", "not a url")]
    fn any_non_blank_value_means_remote(#[case] raw: &'static str, #[case] expected: &str) {
        let selector = selector_with(Some(raw));
        assert!(selector.is_backend_available());
        assert_eq!(selector.backend_api_url().as_deref(), Some(expected));
        assert_eq!(selector.mode(), StorageMode::Remote);
    }

    #[rstest]
    fn environment_is_consulted_on_every_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut env = MockEnv::new();
        env.expect_string().times(0..).returning(move |_| {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            (n % 2 == 0).then(|| "http://backend".to_owned())
        });
        let selector = BackendSelector::new(Arc::new(env));

        assert_eq!(selector.mode(), StorageMode::Remote);
        assert_eq!(selector.mode(), StorageMode::Local);
        assert_eq!(selector.mode(), StorageMode::Remote);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
