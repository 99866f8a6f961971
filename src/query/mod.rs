//! Optional-filter query building

pub mod criteria;
pub mod predicate;
pub mod sql;

pub use criteria::{AuthorFilter, BookFilter, Criteria, PublisherFilter};
pub use predicate::{like_matches, Comparison, Field, Predicate, Record, Relation, TextMatch};
