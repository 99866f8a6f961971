//! Book model

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{dedup_by_id, Author, Entity, EntityKind, Listing, Publisher, Tag};
use crate::query::{BookFilter, Field, Predicate, Record, Relation};

/// Full book record. Authors and tags are sets keyed by id; the publisher is
/// required. Related records are referenced by id when saving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(
        required(message = "title: May not be null"),
        length(min = 1, message = "title: Must have at least 1 character")
    )]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "edition: Must have at least 1 character"))]
    pub edition: Option<String>,
    #[validate(length(min = 1, message = "genre: Must have at least 1 character"))]
    pub genre: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "authors: Must have at least 1 author"))]
    pub authors: Vec<Author>,
    #[validate(range(min = 0, max = 9999, message = "publishingYear: Must be between 0 and 9999"))]
    pub publishing_year: Option<i32>,
    #[validate(range(min = 1, message = "pageCount: Must have a positive value"))]
    pub page_count: Option<i32>,
    #[validate(length(min = 9, message = "isbn: Must have at least 9 characters"))]
    pub isbn: Option<String>,
    #[validate(length(max = 255, message = "notes: Exceeds the limit of 255 characters"))]
    pub notes: Option<String>,
    #[validate(required(message = "publisher: May not be null"))]
    pub publisher: Option<Publisher>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[validate(length(min = 1, message = "shelf: Must have at least 1 character"))]
    pub shelf: Option<String>,
    #[validate(length(min = 1, message = "ledge: Must have at least 1 character"))]
    pub ledge: Option<String>,
}

impl Book {
    pub fn new(title: impl Into<String>, authors: Vec<Author>, publisher: Publisher) -> Self {
        Self {
            title: Some(title.into()),
            authors,
            publisher: Some(publisher),
            ..Default::default()
        }
    }

    /// Collapse duplicate authors and tags
    pub fn normalize_relations(&mut self) {
        dedup_by_id(&mut self.authors);
        dedup_by_id(&mut self.tags);
    }

    pub fn publisher_id(&self) -> Option<i64> {
        self.publisher.as_ref().and_then(|p| p.id)
    }
}

impl Entity for Book {
    const KIND: EntityKind = EntityKind::Book;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn normalize(&mut self) {
        self.normalize_relations();
    }
}

impl Listing for Book {
    const ITEMS_KEY: &'static str = "books";

    type Criteria = BookFilter;

    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.title.cmp(&b.title).then(a.id.cmp(&b.id))
    }
}

impl Record for Book {
    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::BookTitle => self.title.as_deref(),
            Field::BookIsbn => self.isbn.as_deref(),
            Field::BookShelf => self.shelf.as_deref(),
            Field::BookLedge => self.ledge.as_deref(),
            Field::BookPublisherName => self.publisher.as_ref().and_then(|p| p.name.as_deref()),
            _ => None,
        }
    }

    fn number(&self, field: Field) -> Option<i64> {
        match field {
            Field::BookPublishingYear => self.publishing_year.map(i64::from),
            Field::BookPublisherId => self.publisher_id(),
            _ => None,
        }
    }

    fn any_related(&self, relation: Relation, predicate: &Predicate) -> bool {
        match relation {
            Relation::BookAuthors => self.authors.iter().any(|a| predicate.matches(a)),
            Relation::BookTags => self.tags.iter().any(|t| predicate.matches(t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    fn valid_book() -> Book {
        Book::new("Dune", vec![Author::with_id(1)], Publisher::with_id(1))
    }

    #[test]
    fn test_valid_book() {
        assert!(validate(&valid_book()).is_empty());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let book = Book {
            title: None,
            edition: Some(String::new()),
            authors: vec![],
            publishing_year: Some(10_000),
            page_count: Some(0),
            isbn: Some("12345".into()),
            notes: Some("n".repeat(256)),
            publisher: None,
            shelf: Some(String::new()),
            ..Default::default()
        };
        let violations = validate(&book);
        assert_eq!(violations.len(), 9);
        assert!(violations.contains("title: May not be null"));
        assert!(violations.contains("authors: Must have at least 1 author"));
        assert!(violations.contains("publishingYear: Must be between 0 and 9999"));
        assert!(violations.contains("publisher: May not be null"));
    }

    #[test]
    fn test_whitespace_title_is_accepted() {
        let book = Book { title: Some(" ".into()), ..valid_book() };
        assert!(validate(&book).is_empty());
        let book = Book { title: Some(String::new()), ..valid_book() };
        assert_eq!(
            validate(&book).into_iter().collect::<Vec<_>>(),
            vec!["title: Must have at least 1 character"]
        );
    }

    #[test]
    fn test_year_bounds_are_inclusive() {
        let mut book = valid_book();
        book.publishing_year = Some(0);
        assert!(validate(&book).is_empty());
        book.publishing_year = Some(9999);
        assert!(validate(&book).is_empty());
        book.publishing_year = Some(-1);
        assert_eq!(validate(&book).len(), 1);
    }

    #[test]
    fn test_relations_are_deduplicated() {
        let mut book = valid_book();
        book.authors = vec![Author::with_id(2), Author::with_id(1), Author::with_id(2)];
        book.tags = vec![Tag::with_id(5), Tag::with_id(5)];
        book.normalize_relations();
        assert_eq!(book.authors, vec![Author::with_id(2), Author::with_id(1)]);
        assert_eq!(book.tags, vec![Tag::with_id(5)]);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(Book {
            publishing_year: Some(1965),
            page_count: Some(412),
            ..valid_book()
        })
        .unwrap();
        assert_eq!(json["publishingYear"], 1965);
        assert_eq!(json["pageCount"], 412);
        assert_eq!(json["publisher"]["id"], 1);
    }
}
