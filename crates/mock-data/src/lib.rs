//! Plausible seed items for freshly created local wheel datasets.
//!
//! A wheel with nothing on it is useless, so when the local fallback store
//! creates a dataset for an application it fills it with synthesized items.
//! This crate knows nothing about the store's domain types; it produces plain
//! [`MockItemSeed`] values that the caller maps into its own records.
//!
//! # Overview
//!
//! - Items are named `"<appName> 数据 <i>"` and identified `data_<appId>_<i>`,
//!   with `i` counting from 1.
//! - Each item carries between one and three of the application's tags
//!   (never more than the application has), picked by shuffling the tag set
//!   and keeping a prefix.
//! - [`generate_mock_items_seeded`] is deterministic for a given seed.
//!
//! # Example
//!
//! ```
//! use mock_data::{MockItemRequest, generate_mock_items_seeded};
//!
//! let tags = vec!["辣".to_owned(), "川菜".to_owned()];
//! let request = MockItemRequest::new("local_1_2", "午饭", &tags, 3);
//! let items = generate_mock_items_seeded(7, &request).expect("valid request");
//!
//! assert_eq!(items.len(), 3);
//! assert_eq!(items.first().map(|item| item.name.as_str()), Some("午饭 数据 1"));
//! ```

mod error;
mod generator;
mod seed;

pub use error::GenerationError;
pub use generator::{
    DEFAULT_ITEM_COUNT, MAX_TAGS_PER_ITEM, MIN_TAGS_PER_ITEM, generate_mock_items,
    generate_mock_items_seeded,
};
pub use seed::{MockItemRequest, MockItemSeed};
