//! Composable filter predicates.
//!
//! A [`Predicate`] is a tree of typed field matches joined by conjunction,
//! with [`Predicate::Any`] for existential matches over multi-valued
//! relations. Filter specs are built from optional values: an unset value
//! yields no predicate at all, so it never excludes a record.

use regex::Regex;

/// Filterable columns, qualified by the entity they belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    BookTitle,
    BookIsbn,
    BookShelf,
    BookLedge,
    BookPublishingYear,
    BookPublisherId,
    BookPublisherName,
    AuthorId,
    AuthorFirstname,
    AuthorLastname,
    PublisherName,
    TagName,
}

/// Multi-valued relations reachable from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    BookAuthors,
    BookTags,
}

/// How a text filter value is compared with the stored text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    /// Stored text contains the value
    Contains,
    /// Value is a LIKE pattern (`%`, `_`, `\` escapes)
    Like,
    /// Stored text equals the value
    Equals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equals,
    /// Stored value is greater than or equal to the filter value
    AtLeast,
    /// Stored value is less than or equal to the filter value
    AtMost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Conjunction; the empty conjunction always matches
    All(Vec<Predicate>),
    Text {
        field: Field,
        mode: TextMatch,
        value: String,
    },
    Number {
        field: Field,
        comparison: Comparison,
        value: i64,
    },
    /// Matches when any related record satisfies the inner predicate
    Any {
        relation: Relation,
        predicate: Box<Predicate>,
    },
}

/// Read access to the filterable fields of a record
pub trait Record {
    fn text(&self, field: Field) -> Option<&str>;

    fn number(&self, field: Field) -> Option<i64>;

    fn any_related(&self, _relation: Relation, _predicate: &Predicate) -> bool {
        false
    }
}

impl Predicate {
    /// The predicate matching every record
    pub fn always() -> Self {
        Predicate::All(Vec::new())
    }

    pub fn text(field: Field, mode: TextMatch, value: Option<&str>) -> Option<Self> {
        value.map(|value| Predicate::Text {
            field,
            mode,
            value: value.to_string(),
        })
    }

    pub fn number(field: Field, comparison: Comparison, value: Option<i64>) -> Option<Self> {
        value.map(|value| Predicate::Number { field, comparison, value })
    }

    /// Conjunction of the filter specs that are set
    pub fn all(parts: impl IntoIterator<Item = Option<Predicate>>) -> Self {
        let parts: Vec<Predicate> = parts
            .into_iter()
            .flatten()
            .filter(|p| !p.is_tautology())
            .collect();
        match <[Predicate; 1]>::try_from(parts) {
            Ok([single]) => single,
            Err(parts) => Predicate::All(parts),
        }
    }

    /// Existential match over `relation`; `None` when `predicate` constrains nothing
    pub fn any(relation: Relation, predicate: Predicate) -> Option<Self> {
        if predicate.is_tautology() {
            None
        } else {
            Some(Predicate::Any {
                relation,
                predicate: Box::new(predicate),
            })
        }
    }

    pub fn is_tautology(&self) -> bool {
        match self {
            Predicate::All(parts) => parts.iter().all(Predicate::is_tautology),
            _ => false,
        }
    }

    /// Evaluate against an in-memory record
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Predicate::All(parts) => parts.iter().all(|p| p.matches(record)),
            Predicate::Text { field, mode, value } => match record.text(*field) {
                Some(text) => match mode {
                    TextMatch::Contains => like_matches(&format!("%{}%", value), text),
                    TextMatch::Like => like_matches(value, text),
                    TextMatch::Equals => text == value,
                },
                None => false,
            },
            Predicate::Number { field, comparison, value } => match record.number(*field) {
                Some(n) => match comparison {
                    Comparison::Equals => n == *value,
                    Comparison::AtLeast => n >= *value,
                    Comparison::AtMost => n <= *value,
                },
                None => false,
            },
            Predicate::Any { relation, predicate } => record.any_related(*relation, predicate),
        }
    }
}

/// Translate a LIKE pattern into an anchored regular expression
fn like_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut expr = String::from("(?s)^");
    let mut literal = String::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let wildcard = match c {
            '%' => ".*",
            '_' => ".",
            '\\' => {
                literal.push(chars.next().unwrap_or('\\'));
                continue;
            }
            c => {
                literal.push(c);
                continue;
            }
        };
        expr.push_str(&regex::escape(&literal));
        literal.clear();
        expr.push_str(wildcard);
    }
    expr.push_str(&regex::escape(&literal));
    expr.push('$');
    Regex::new(&expr)
}

/// Case-sensitive SQL `LIKE` matching
pub fn like_matches(pattern: &str, text: &str) -> bool {
    match like_regex(pattern) {
        Ok(re) => re.is_match(text),
        Err(err) => {
            tracing::warn!("Unusable LIKE pattern {:?}: {}", pattern, err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        title: Option<&'static str>,
        year: Option<i64>,
        tags: Vec<&'static str>,
    }

    struct TagRow(&'static str);

    impl Record for TagRow {
        fn text(&self, field: Field) -> Option<&str> {
            match field {
                Field::TagName => Some(self.0),
                _ => None,
            }
        }

        fn number(&self, _field: Field) -> Option<i64> {
            None
        }
    }

    impl Record for Row {
        fn text(&self, field: Field) -> Option<&str> {
            match field {
                Field::BookTitle => self.title,
                _ => None,
            }
        }

        fn number(&self, field: Field) -> Option<i64> {
            match field {
                Field::BookPublishingYear => self.year,
                _ => None,
            }
        }

        fn any_related(&self, relation: Relation, predicate: &Predicate) -> bool {
            match relation {
                Relation::BookTags => self.tags.iter().any(|t| predicate.matches(&TagRow(t))),
                Relation::BookAuthors => false,
            }
        }
    }

    fn row(title: &'static str, year: i64, tags: &[&'static str]) -> Row {
        Row { title: Some(title), year: Some(year), tags: tags.to_vec() }
    }

    #[test]
    fn test_like_wildcards() {
        assert!(like_matches("Meyer", "Meyer"));
        assert!(!like_matches("Andrea", "Andreas"));
        assert!(like_matches("Andrea%", "Andreas"));
        assert!(like_matches("%dre%", "Andreas"));
        assert!(like_matches("A_drea", "Andrea"));
        assert!(!like_matches("A_drea", "Adrea"));
        assert!(like_matches("%", ""));
        assert!(!like_matches("_", ""));
        assert!(like_matches("978%1", "978-3-16-148410-1"));
        assert!(like_matches("%a%b%c", "xaxxbyyc"));
        assert!(!like_matches("%a%b%c", "xaxxbyy"));
    }

    #[test]
    fn test_like_is_case_sensitive() {
        assert!(!like_matches("java", "Java"));
        assert!(!like_matches("%java%", "Learning Java"));
    }

    #[test]
    fn test_like_escaped_wildcards() {
        assert!(like_matches("100\\%", "100%"));
        assert!(!like_matches("100\\%", "1000"));
        assert!(like_matches("a\\_b", "a_b"));
        assert!(!like_matches("a\\_b", "axb"));
        assert!(like_matches("back\\", "back\\"));
    }

    #[test]
    fn test_like_treats_regex_syntax_literally() {
        assert!(like_matches("C++ (2nd ed.)", "C++ (2nd ed.)"));
        assert!(!like_matches("a.c", "abc"));
        assert!(like_matches("%[draft]%", "Notes [draft] v2"));
        assert!(like_matches("multi%line", "multi\nline"));
    }

    #[test]
    fn test_unset_specs_are_tautologies() {
        let predicate = Predicate::all([
            Predicate::text(Field::BookTitle, TextMatch::Contains, None),
            Predicate::number(Field::BookPublishingYear, Comparison::AtLeast, None),
        ]);
        assert!(predicate.is_tautology());
        assert!(predicate.matches(&row("Anything", 1, &[])));
        assert!(Predicate::any(Relation::BookTags, Predicate::always()).is_none());
    }

    #[test]
    fn test_single_spec_is_not_wrapped() {
        let predicate = Predicate::all([
            None,
            Predicate::text(Field::BookTitle, TextMatch::Equals, Some("Dune")),
        ]);
        assert!(matches!(predicate, Predicate::Text { .. }));
    }

    #[test]
    fn test_contains_and_year_bounds() {
        let books = [row("Rust in Action", 1990, &[]), row("Java", 2000, &[]), row("Rusty", 2010, &[])];

        let at_least = Predicate::number(Field::BookPublishingYear, Comparison::AtLeast, Some(2000)).unwrap();
        let years: Vec<i64> = books.iter().filter(|b| at_least.matches(*b)).filter_map(|b| b.year).collect();
        assert_eq!(years, vec![2000, 2010]);

        let at_most = Predicate::number(Field::BookPublishingYear, Comparison::AtMost, Some(2000)).unwrap();
        let years: Vec<i64> = books.iter().filter(|b| at_most.matches(*b)).filter_map(|b| b.year).collect();
        assert_eq!(years, vec![1990, 2000]);

        let contains = Predicate::text(Field::BookTitle, TextMatch::Contains, Some("Rust")).unwrap();
        assert_eq!(books.iter().filter(|b| contains.matches(*b)).count(), 2);
    }

    #[test]
    fn test_missing_values_never_match() {
        let untitled = Row { title: None, year: None, tags: vec![] };
        let predicate = Predicate::all([
            Predicate::text(Field::BookTitle, TextMatch::Contains, Some("")),
        ]);
        assert!(!predicate.matches(&untitled));
        let year = Predicate::number(Field::BookPublishingYear, Comparison::AtMost, Some(3000)).unwrap();
        assert!(!year.matches(&untitled));
    }

    #[test]
    fn test_existential_relation() {
        let book = row("Trips", 2001, &["Travel", "Java"]);
        let tag = |name: &str| {
            Predicate::any(
                Relation::BookTags,
                Predicate::text(Field::TagName, TextMatch::Like, Some(name)).unwrap(),
            )
            .unwrap()
        };
        assert!(tag("Java").matches(&book));
        assert!(tag("Travel").matches(&book));
        assert!(!tag("History").matches(&book));
    }
}
