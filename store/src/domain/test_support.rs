//! Shared fixtures for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::{Clock, MockEnv};

use super::{BACKEND_API_URL_ENV, BackendSelector};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

/// Selector reporting `url` as the configured backend.
pub(crate) fn selector(url: Option<&'static str>) -> BackendSelector {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| match key {
            BACKEND_API_URL_ENV => url.map(str::to_owned),
            _ => None,
        });
    BackendSelector::new(Arc::new(env))
}

pub(crate) fn remote_selector() -> BackendSelector {
    selector(Some("http://backend.test"))
}

pub(crate) fn local_selector() -> BackendSelector {
    selector(None)
}

/// Selector pointing at a backend only known at runtime, such as a mock
/// server.
pub(crate) fn selector_at(url: String) -> BackendSelector {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| (key == BACKEND_API_URL_ENV).then(|| url.clone()));
    BackendSelector::new(Arc::new(env))
}
