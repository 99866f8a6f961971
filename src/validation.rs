//! Record validation.
//!
//! Each entity kind declares its constraints with `#[derive(Validate)]`
//! attributes. [`validate`] runs every one of them and returns the message of
//! each violation; it never stops at the first failure. Optional fields are
//! only checked when present, except where `required` is declared.

use std::collections::BTreeSet;

use validator::{Validate, ValidationErrors};

use crate::error::{AppError, AppResult};

/// Flatten field errors into their messages
fn messages(errors: &ValidationErrors) -> BTreeSet<String> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{}: {}", field, error.code),
            })
        })
        .collect()
}

/// Run every constraint of `record` and collect the violated messages
pub fn validate<T: Validate>(record: &T) -> BTreeSet<String> {
    match record.validate() {
        Ok(()) => BTreeSet::new(),
        Err(errors) => messages(&errors),
    }
}

/// Fail with [`AppError::InvalidRecord`] carrying every violated message
pub fn ensure_valid<T: Validate>(record: &T) -> AppResult<()> {
    let violations = validate(record);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidRecord(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Shelf {
        #[validate(length(min = 2, message = "code: Must have at least 2 characters"))]
        code: Option<String>,
        #[validate(range(min = 0, max = 9999, message = "year: Must be between 0 and 9999"))]
        year: Option<i32>,
        #[validate(required(message = "label: May not be null"))]
        label: Option<String>,
        #[validate(length(min = 1, message = "books: Must hold at least 1 book"))]
        books: Vec<String>,
        #[validate(length(min = 1))]
        room: Option<String>,
    }

    fn valid_shelf() -> Shelf {
        Shelf {
            code: Some("A1".into()),
            year: Some(2000),
            label: Some("x".into()),
            books: vec!["Dune".into()],
            room: None,
        }
    }

    #[test]
    fn test_valid_record_has_no_violations() {
        assert!(validate(&valid_shelf()).is_empty());
        assert!(ensure_valid(&valid_shelf()).is_ok());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let shelf = Shelf {
            code: Some("A".into()),
            year: Some(10_000),
            label: None,
            books: vec![],
            room: None,
        };
        let violations = validate(&shelf);
        assert_eq!(violations.len(), 4);
        assert!(violations.contains("code: Must have at least 2 characters"));
        assert!(violations.contains("year: Must be between 0 and 9999"));
        assert!(violations.contains("label: May not be null"));
        assert!(violations.contains("books: Must hold at least 1 book"));
    }

    #[test]
    fn test_absent_optional_values_pass() {
        let shelf = Shelf { code: None, year: None, ..valid_shelf() };
        assert!(validate(&shelf).is_empty());
    }

    #[test]
    fn test_missing_message_falls_back_to_field_and_code() {
        let shelf = Shelf { room: Some(String::new()), ..valid_shelf() };
        let violations = validate(&shelf);
        assert_eq!(violations.into_iter().collect::<Vec<_>>(), vec!["room: length"]);
    }

    #[test]
    fn test_ensure_valid_carries_every_message() {
        let shelf = Shelf { year: Some(-5), books: vec![], ..valid_shelf() };
        match ensure_valid(&shelf) {
            Err(AppError::InvalidRecord(messages)) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_length_counts_characters() {
        let shelf = Shelf { code: Some("éé".into()), ..valid_shelf() };
        assert!(validate(&shelf).is_empty());
    }
}
