//! Data models for the catalog

pub mod author;
pub mod book;
pub mod publisher;
pub mod tag;

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::query::{Criteria, Record};

// Re-export commonly used types
pub use author::Author;
pub use book::Book;
pub use publisher::Publisher;
pub use tag::Tag;

/// The kinds of records held by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Book,
    Author,
    Publisher,
    Tag,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Book => "Book",
            EntityKind::Author => "Author",
            EntityKind::Publisher => "Publisher",
            EntityKind::Tag => "Tag",
        };
        f.write_str(name)
    }
}

/// A stored record with a store-assigned identifier
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// Canonicalize the record before it is validated and stored
    fn normalize(&mut self) {}
}

/// Entities offering paged listing and filtering
pub trait Listing: Entity + Record + Serialize {
    /// Key the page content is listed under in paged responses
    const ITEMS_KEY: &'static str;

    type Criteria: Criteria + Send + Sync;

    /// Fixed listing order
    fn listing_order(a: &Self, b: &Self) -> Ordering;
}

/// Deduplicate a relation set by id, keeping the first occurrence
pub(crate) fn dedup_by_id<T: Entity>(records: &mut Vec<T>) {
    let mut seen = std::collections::HashSet::new();
    records.retain(|r| match r.id() {
        Some(id) => seen.insert(id),
        None => true,
    });
}
