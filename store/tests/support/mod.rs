//! Shared helpers for the store integration tests.
//!
//! Each file under `store/tests/` compiles as its own crate, so the fixed
//! clock and the switchable backend environment live here.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::{Clock, Env, MockEnv};
use tuna_store::domain::BACKEND_API_URL_ENV;
use tuna_store::domain::ports::KeyValueStore;
use tuna_store::{Services, StoreSettings, build_services};

/// Clock frozen at 2025-03-01T12:00:00Z.
pub struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    let now = Utc
        .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    Arc::new(FixedClock(now))
}

/// Backend URL that tests can change between calls. Starts unset, which
/// selects local mode.
#[derive(Clone, Default)]
pub struct BackendUrl(Arc<Mutex<Option<String>>>);

impl BackendUrl {
    pub fn set(&self, url: Option<String>) {
        *self.0.lock().expect("backend url lock") = url;
    }

    pub fn env(&self) -> Arc<dyn Env + Send + Sync> {
        let shared = Arc::clone(&self.0);
        let mut env = MockEnv::new();
        env.expect_string().times(0..).returning(move |key| {
            if key == BACKEND_API_URL_ENV {
                shared.lock().expect("backend url lock").clone()
            } else {
                None
            }
        });
        Arc::new(env)
    }
}

/// Services over `store`, with the backend at `url`.
pub fn services(store: Arc<dyn KeyValueStore>, url: &BackendUrl) -> Services {
    let settings = StoreSettings {
        request_timeout_secs: Some(5),
        ..StoreSettings::default()
    };
    build_services(store, url.env(), fixed_clock(), &settings).expect("services should build")
}
