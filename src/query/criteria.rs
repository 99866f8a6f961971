//! Per-kind filter criteria and their predicates

use serde::Deserialize;
use utoipa::IntoParams;

use super::predicate::{Comparison, Field, Predicate, Relation, TextMatch};

/// Filter criteria compiling to a single conjunctive predicate
pub trait Criteria {
    fn predicate(&self) -> Predicate;
}

/// Book filter query parameters.
///
/// Note the year bounds: `publishedBefore` keeps books published in or
/// *after* the given year, `publishedAfter` keeps books published in or
/// *before* it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookFilter {
    pub book_title: Option<String>,
    pub author_id: Option<i64>,
    #[serde(rename = "authorFName")]
    pub author_firstname: Option<String>,
    #[serde(rename = "authorLName")]
    pub author_lastname: Option<String>,
    /// Lower bound (inclusive) on the publishing year
    pub published_before: Option<i32>,
    /// Upper bound (inclusive) on the publishing year
    pub published_after: Option<i32>,
    pub isbn: Option<String>,
    pub publisher_id: Option<i64>,
    /// Publisher name pattern
    pub publisher: Option<String>,
    /// Tag name pattern
    pub tag: Option<String>,
    pub shelf: Option<String>,
    pub ledge: Option<String>,
}

impl Criteria for BookFilter {
    fn predicate(&self) -> Predicate {
        // One author has to satisfy every author field
        let author = Predicate::all([
            Predicate::number(Field::AuthorId, Comparison::Equals, self.author_id),
            Predicate::text(Field::AuthorFirstname, TextMatch::Like, self.author_firstname.as_deref()),
            Predicate::text(Field::AuthorLastname, TextMatch::Like, self.author_lastname.as_deref()),
        ]);
        let tag = Predicate::text(Field::TagName, TextMatch::Like, self.tag.as_deref());

        Predicate::all([
            Predicate::text(Field::BookTitle, TextMatch::Contains, self.book_title.as_deref()),
            Predicate::any(Relation::BookAuthors, author),
            Predicate::number(
                Field::BookPublishingYear,
                Comparison::AtLeast,
                self.published_before.map(i64::from),
            ),
            Predicate::number(
                Field::BookPublishingYear,
                Comparison::AtMost,
                self.published_after.map(i64::from),
            ),
            Predicate::text(Field::BookIsbn, TextMatch::Like, self.isbn.as_deref()),
            Predicate::number(Field::BookPublisherId, Comparison::Equals, self.publisher_id),
            Predicate::text(Field::BookPublisherName, TextMatch::Like, self.publisher.as_deref()),
            tag.and_then(|tag| Predicate::any(Relation::BookTags, tag)),
            Predicate::text(Field::BookShelf, TextMatch::Equals, self.shelf.as_deref()),
            Predicate::text(Field::BookLedge, TextMatch::Equals, self.ledge.as_deref()),
        ])
    }
}

/// Author filter query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorFilter {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl Criteria for AuthorFilter {
    fn predicate(&self) -> Predicate {
        Predicate::all([
            Predicate::text(Field::AuthorFirstname, TextMatch::Like, self.firstname.as_deref()),
            Predicate::text(Field::AuthorLastname, TextMatch::Like, self.lastname.as_deref()),
        ])
    }
}

/// Publisher filter query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PublisherFilter {
    pub name: Option<String>,
}

impl Criteria for PublisherFilter {
    fn predicate(&self) -> Predicate {
        Predicate::all([Predicate::text(Field::PublisherName, TextMatch::Like, self.name.as_deref())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_criteria_are_tautologies() {
        assert!(BookFilter::default().predicate().is_tautology());
        assert!(AuthorFilter::default().predicate().is_tautology());
        assert!(PublisherFilter::default().predicate().is_tautology());
    }

    #[test]
    fn test_year_bounds_keep_their_inverted_naming() {
        let before = BookFilter { published_before: Some(2000), ..Default::default() };
        assert_eq!(
            before.predicate(),
            Predicate::Number {
                field: Field::BookPublishingYear,
                comparison: Comparison::AtLeast,
                value: 2000,
            }
        );

        let after = BookFilter { published_after: Some(2000), ..Default::default() };
        assert_eq!(
            after.predicate(),
            Predicate::Number {
                field: Field::BookPublishingYear,
                comparison: Comparison::AtMost,
                value: 2000,
            }
        );
    }

    #[test]
    fn test_query_parameter_names() {
        let filter: BookFilter = serde_json::from_value(serde_json::json!({
            "bookTitle": "Dune",
            "authorFName": "Frank",
            "authorLName": "Herbert",
            "publishedBefore": 1960,
            "publisherId": 3
        }))
        .unwrap();
        assert_eq!(filter.book_title.as_deref(), Some("Dune"));
        assert_eq!(filter.author_firstname.as_deref(), Some("Frank"));
        assert_eq!(filter.author_lastname.as_deref(), Some("Herbert"));
        assert_eq!(filter.published_before, Some(1960));
        assert_eq!(filter.publisher_id, Some(3));
    }

    #[test]
    fn test_author_only_filter_is_one_existential() {
        let filter = BookFilter { author_id: Some(1), ..Default::default() };
        match filter.predicate() {
            Predicate::Any { relation, predicate } => {
                assert_eq!(relation, Relation::BookAuthors);
                assert!(matches!(*predicate, Predicate::Number { field: Field::AuthorId, .. }));
            }
            other => panic!("unexpected predicate: {:?}", other),
        }
    }
}
