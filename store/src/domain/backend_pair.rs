//! Remote and local implementations of one port, chosen per call.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use super::{BackendSelector, StorageMode};

/// Two interchangeable adapters for the same port.
///
/// The remote adapter is offered only while the selector reports a
/// configured backend. The two stores are never reconciled: a record written
/// to one is invisible to the other.
pub struct BackendPair<P: ?Sized> {
    remote: Arc<P>,
    local: Arc<P>,
    selector: BackendSelector,
}

impl<P: ?Sized> BackendPair<P> {
    pub fn new(remote: Arc<P>, local: Arc<P>, selector: BackendSelector) -> Self {
        Self {
            remote,
            local,
            selector,
        }
    }

    /// The remote adapter, when a backend is configured for this call.
    pub fn remote(&self) -> Option<&P> {
        self.selector
            .is_backend_available()
            .then_some(self.remote.as_ref())
    }

    /// The local adapter; always present.
    pub fn local(&self) -> &P {
        self.local.as_ref()
    }

    pub fn mode(&self) -> StorageMode {
        self.selector.mode()
    }
}

impl<P: ?Sized> Clone for BackendPair<P> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            local: Arc::clone(&self.local),
            selector: self.selector.clone(),
        }
    }
}

impl<P: ?Sized> fmt::Debug for BackendPair<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendPair")
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

/// Record that a remote call failed and the local store takes over.
pub(crate) fn log_fallback(operation: &'static str, error: &dyn std::error::Error) {
    warn!(
        operation,
        error = %error,
        "remote call failed; serving from local store"
    );
}
