//! Author model

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{Entity, EntityKind, Listing};
use crate::query::{AuthorFilter, Field, Record};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Assigned by the store on first save
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(
        required(message = "firstname: May not be null"),
        length(min = 1, message = "firstname: Must have at least 1 character")
    )]
    pub firstname: Option<String>,
    #[validate(
        required(message = "lastname: May not be null"),
        length(min = 1, message = "lastname: Must have at least 1 character")
    )]
    pub lastname: Option<String>,
}

impl Author {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            id: None,
            firstname: Some(firstname.into()),
            lastname: Some(lastname.into()),
        }
    }

    /// Reference to an already stored author
    pub fn with_id(id: i64) -> Self {
        Self { id: Some(id), ..Default::default() }
    }
}

impl Entity for Author {
    const KIND: EntityKind = EntityKind::Author;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl Listing for Author {
    const ITEMS_KEY: &'static str = "authors";

    type Criteria = AuthorFilter;

    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.lastname.cmp(&b.lastname).then(a.id.cmp(&b.id))
    }
}

impl Record for Author {
    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::AuthorFirstname => self.firstname.as_deref(),
            Field::AuthorLastname => self.lastname.as_deref(),
            _ => None,
        }
    }

    fn number(&self, field: Field) -> Option<i64> {
        match field {
            Field::AuthorId => self.id,
            _ => None,
        }
    }
}
