//! Item record and its wire representation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validation::validate_item;

/// Persisted inventory record
///
/// `id` is `None` until the store assigns one on first save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

impl Item {
    /// Build an unsaved item
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        quantity: i32,
        price: Decimal,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
            quantity,
            price,
        }
    }

    /// Overwrite every mutable field from `other`, keeping this item's id
    pub fn replace_fields(&mut self, other: Item) {
        self.name = other.name;
        self.description = other.description;
        self.quantity = other.quantity;
        self.price = other.price;
    }
}

/// Item as it appears on the wire
///
/// Required fields are optional here so that a missing value surfaces as a
/// validation failure rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl ItemDto {
    /// Validate and convert into a domain record
    ///
    /// The incoming `id` is carried over; callers decide whether to honor it.
    pub fn into_item(self) -> Result<Item> {
        let violations = validate_item(&self);
        if !violations.is_empty() {
            return Err(Error::Validation(violations));
        }

        match (self.name, self.quantity, self.price) {
            (Some(name), Some(quantity), Some(price)) => Ok(Item {
                id: self.id,
                name,
                description: self.description,
                quantity,
                price,
            }),
            _ => Err(Error::Internal(
                "validated item is missing a required field".to_string(),
            )),
        }
    }
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: Some(item.name),
            description: item.description,
            quantity: Some(item.quantity),
            price: Some(item.price),
        }
    }
}
