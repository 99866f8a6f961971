//! Compilation of [`Predicate`] trees into SQL `WHERE` clauses.
//!
//! Every filter value is pushed as a bound parameter. Column names come from
//! a closed set of aliases: `b` (books), `p` (publishers), `a` (authors),
//! `t` (tags).

use sqlx::{Postgres, QueryBuilder};

use super::predicate::{Comparison, Field, Predicate, Relation, TextMatch};

impl Field {
    /// Qualified column this field is read from
    pub fn column(self) -> &'static str {
        match self {
            Field::BookTitle => "b.title",
            Field::BookIsbn => "b.isbn",
            Field::BookShelf => "b.shelf",
            Field::BookLedge => "b.ledge",
            Field::BookPublishingYear => "b.publishing_year",
            Field::BookPublisherId => "b.publisher_id",
            Field::BookPublisherName | Field::PublisherName => "p.name",
            Field::AuthorId => "a.id",
            Field::AuthorFirstname => "a.firstname",
            Field::AuthorLastname => "a.lastname",
            Field::TagName => "t.name",
        }
    }
}

impl Relation {
    /// Opening of the `EXISTS` subquery joining a book to the related rows
    fn exists_prefix(self) -> &'static str {
        match self {
            Relation::BookAuthors => {
                "EXISTS (SELECT 1 FROM book_authors ba JOIN authors a ON a.id = ba.author_id \
                 WHERE ba.book_id = b.id AND "
            }
            Relation::BookTags => {
                "EXISTS (SELECT 1 FROM book_tags bt JOIN tags t ON t.id = bt.tag_id \
                 WHERE bt.book_id = b.id AND "
            }
        }
    }
}

/// Append `predicate` as a boolean SQL expression
pub fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::All(parts) if parts.is_empty() => {
            builder.push("TRUE");
        }
        Predicate::All(parts) => {
            builder.push("(");
            for (idx, part) in parts.iter().enumerate() {
                if idx > 0 {
                    builder.push(" AND ");
                }
                push_predicate(builder, part);
            }
            builder.push(")");
        }
        Predicate::Text { field, mode, value } => {
            builder.push(field.column());
            match mode {
                TextMatch::Contains => {
                    builder.push(" LIKE '%' || ").push_bind(value.clone()).push(" || '%'");
                }
                TextMatch::Like => {
                    builder.push(" LIKE ").push_bind(value.clone());
                }
                TextMatch::Equals => {
                    builder.push(" = ").push_bind(value.clone());
                }
            }
        }
        Predicate::Number { field, comparison, value } => {
            builder.push(field.column());
            builder.push(match comparison {
                Comparison::Equals => " = ",
                Comparison::AtLeast => " >= ",
                Comparison::AtMost => " <= ",
            });
            builder.push_bind(*value);
        }
        Predicate::Any { relation, predicate } => {
            builder.push(relation.exists_prefix());
            push_predicate(builder, predicate);
            builder.push(")");
        }
    }
}

/// Append ` WHERE <predicate>`
pub fn push_where(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    builder.push(" WHERE ");
    push_predicate(builder, predicate);
}
