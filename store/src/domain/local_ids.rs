//! Identifier synthesis for records created in local mode.
//!
//! Formats:
//! - applications: `local_<millis>_<0..=999>`
//! - datasets: `dataset_<millis>_<0..=999>`
//! - items: `item_<datasetId>_<millis>`
//!
//! Identifiers are unique within the collection they are inserted into. A
//! colliding random suffix is re-drawn; a colliding item timestamp is bumped.

use std::sync::Arc;

use mockable::Clock;
use rand::Rng;

const RANDOM_SUFFIX_BOUND: u16 = 1_000;
const RANDOM_DRAWS: usize = 16;

/// Allocates identifiers stamped with the injected clock.
#[derive(Clone)]
pub struct LocalIdGenerator {
    clock: Arc<dyn Clock>,
}

impl LocalIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// New application id not rejected by `is_taken`.
    pub fn application_id(&self, is_taken: impl Fn(&str) -> bool) -> String {
        self.suffixed_id("local", is_taken)
    }

    /// New dataset id not rejected by `is_taken`.
    pub fn dataset_id(&self, is_taken: impl Fn(&str) -> bool) -> String {
        self.suffixed_id("dataset", is_taken)
    }

    /// New item id within `dataset_id` not rejected by `is_taken`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use mockable::DefaultClock;
    /// use tuna_store::domain::LocalIdGenerator;
    ///
    /// let ids = LocalIdGenerator::new(Arc::new(DefaultClock));
    /// let id = ids.item_id("dataset_1_2", |_| false);
    /// assert!(id.starts_with("item_dataset_1_2_"));
    /// ```
    pub fn item_id(&self, dataset_id: &str, is_taken: impl Fn(&str) -> bool) -> String {
        let mut millis = self.millis();
        loop {
            let candidate = format!("item_{dataset_id}_{millis}");
            if !is_taken(&candidate) {
                return candidate;
            }
            millis += 1;
        }
    }

    fn suffixed_id(&self, prefix: &str, is_taken: impl Fn(&str) -> bool) -> String {
        let mut rng = rand::rng();
        let mut millis = self.millis();
        loop {
            for _ in 0..RANDOM_DRAWS {
                let suffix = rng.random_range(0..RANDOM_SUFFIX_BOUND);
                let candidate = format!("{prefix}_{millis}_{suffix}");
                if !is_taken(&candidate) {
                    return candidate;
                }
            }
            // Dense millisecond: take any free suffix before moving on.
            for suffix in 0..RANDOM_SUFFIX_BOUND {
                let candidate = format!("{prefix}_{millis}_{suffix}");
                if !is_taken(&candidate) {
                    return candidate;
                }
            }
            millis += 1;
        }
    }

    fn millis(&self) -> i64 {
        self.clock.utc().timestamp_millis()
    }
}
