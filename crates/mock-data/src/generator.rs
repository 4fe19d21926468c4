//! Mock item synthesis.
//!
//! Tag selection shuffles the whole vocabulary and keeps a prefix, which is
//! distributed exactly like sampling a subset without replacement.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GenerationError;
use crate::seed::{MockItemRequest, MockItemSeed};

/// Number of items seeded into a fresh local dataset unless configured
/// otherwise.
pub const DEFAULT_ITEM_COUNT: usize = 10;

/// Minimum number of tags given to an item when the vocabulary allows it.
pub const MIN_TAGS_PER_ITEM: usize = 1;

/// Maximum number of tags given to an item.
pub const MAX_TAGS_PER_ITEM: usize = 3;

/// Synthesizes `request.count` items using the supplied RNG.
///
/// An application without tags yields items with empty tag lists.
///
/// # Errors
///
/// Returns [`GenerationError`] when the request has a blank application id.
pub fn generate_mock_items<R: Rng + ?Sized>(
    rng: &mut R,
    request: &MockItemRequest<'_>,
) -> Result<Vec<MockItemSeed>, GenerationError> {
    request.validate()?;

    let items = (1..=request.count)
        .map(|index| MockItemSeed {
            id: format!("data_{}_{index}", request.application_id),
            name: format!("{} 数据 {index}", request.application_name),
            tags: select_tags(rng, request.tags, MIN_TAGS_PER_ITEM, MAX_TAGS_PER_ITEM),
        })
        .collect();
    Ok(items)
}

/// Deterministic variant of [`generate_mock_items`] driven by `seed`.
///
/// # Errors
///
/// Returns [`GenerationError`] when the request has a blank application id.
///
/// # Example
///
/// ```
/// use mock_data::{MockItemRequest, generate_mock_items_seeded};
///
/// let tags = vec!["a".to_owned(), "b".to_owned(), "c".to_owned(), "d".to_owned()];
/// let request = MockItemRequest::new("app", "Lunch", &tags, 5);
/// let first = generate_mock_items_seeded(42, &request).expect("generated");
/// let second = generate_mock_items_seeded(42, &request).expect("generated");
/// assert_eq!(first, second);
/// ```
pub fn generate_mock_items_seeded(
    seed: u64,
    request: &MockItemRequest<'_>,
) -> Result<Vec<MockItemSeed>, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_mock_items(&mut rng, request)
}

/// Picks between `min_count` and `max_count` tags, clamped to the
/// vocabulary size.
fn select_tags<R: Rng + ?Sized>(
    rng: &mut R,
    tags: &[String],
    min_count: usize,
    max_count: usize,
) -> Vec<String> {
    if tags.is_empty() {
        return Vec::new();
    }

    let low = min_count.min(tags.len());
    let high = max_count.min(tags.len());
    let count = if low == high {
        low
    } else {
        rng.random_range(low..=high)
    };

    let mut shuffled = tags.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}
