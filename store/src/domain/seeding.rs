//! Mock item seeding for freshly created local item collections.

use chrono::{DateTime, Utc};
use mock_data::{GenerationError, MockItemRequest, MockItemSeed, generate_mock_items};
use serde_json::Map;

use super::{Application, DatasetItem};

/// The application whose name and tags shape seeded items.
#[derive(Debug, Clone, Copy)]
pub struct SeedTarget<'a> {
    pub application_id: &'a str,
    pub application_name: &'a str,
    pub tags: &'a [String],
}

impl<'a> SeedTarget<'a> {
    pub fn new(application: &'a Application) -> Self {
        Self {
            application_id: &application.id,
            application_name: &application.name,
            tags: &application.tags,
        }
    }

    /// Target for `application_id`, using the resolved application when
    /// available. An unresolved application seeds under its identifier with
    /// no tags.
    pub fn resolve(application_id: &'a str, application: Option<&'a Application>) -> Self {
        match application {
            Some(application) => Self::new(application),
            None => Self {
                application_id,
                application_name: application_id,
                tags: &[],
            },
        }
    }
}

/// Synthesize `count` items for `target`, owned by `owner_id`.
pub(crate) fn synthesize_items(
    target: SeedTarget<'_>,
    owner_id: &str,
    count: usize,
    now: DateTime<Utc>,
) -> Result<Vec<DatasetItem>, GenerationError> {
    let request = MockItemRequest::new(
        target.application_id,
        target.application_name,
        target.tags,
        count,
    );
    let seeds = generate_mock_items(&mut rand::rng(), &request)?;
    Ok(seeds
        .into_iter()
        .map(|seed| seeded_item(seed, owner_id, now))
        .collect())
}

fn seeded_item(seed: MockItemSeed, owner_id: &str, now: DateTime<Utc>) -> DatasetItem {
    let MockItemSeed { id, name, tags } = seed;
    DatasetItem {
        id,
        dataset_id: owner_id.to_owned(),
        name,
        description: None,
        category: None,
        tags,
        created_at: now,
        updated_at: None,
        attributes: Map::new(),
    }
}
