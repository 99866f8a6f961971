//! Publisher model

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{Entity, EntityKind, Listing};
use crate::query::{Field, PublisherFilter, Record};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(
        required(message = "name: May not be null"),
        length(min = 2, message = "name: Must have at least 2 characters")
    )]
    pub name: Option<String>,
}

impl Publisher {
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: None, name: Some(name.into()) }
    }

    pub fn with_id(id: i64) -> Self {
        Self { id: Some(id), name: None }
    }
}

impl Entity for Publisher {
    const KIND: EntityKind = EntityKind::Publisher;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl Listing for Publisher {
    const ITEMS_KEY: &'static str = "publishers";

    type Criteria = PublisherFilter;

    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name).then(a.id.cmp(&b.id))
    }
}

impl Record for Publisher {
    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::PublisherName => self.name.as_deref(),
            _ => None,
        }
    }

    fn number(&self, _field: Field) -> Option<i64> {
        None
    }
}
