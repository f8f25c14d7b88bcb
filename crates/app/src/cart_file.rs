//! Cart files
//!
//! A cart prepared ahead of time as YAML, for quoting or checking out from
//! the command line.

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use valet::{
    cart::{Cart, CartError},
    catalog::{Catalog, ItemId, ServiceType},
    customers::Customer,
    delivery::DeliveryInfo,
};

/// Errors raised while loading a cart file.
#[derive(Debug, Error)]
pub enum CartFileError {
    /// Document could not be parsed.
    #[error("failed to parse cart file: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A line names an item missing from the catalog.
    #[error("unknown catalog item: {0}")]
    UnknownItem(ItemId),

    /// A line could not be added.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// One requested line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartFileLine {
    /// Catalog item id.
    pub item_id: ItemId,

    /// Service tier.
    #[serde(default)]
    pub service_type: ServiceType,

    /// Units; defaults to one.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Cart file contents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartFile {
    /// Selected customer.
    #[serde(default)]
    pub customer: Option<Customer>,

    /// Operator-entered flat discount.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub manual_discount: Decimal,

    /// Pickup/delivery schedule; omit for counter collection.
    #[serde(default)]
    pub delivery: Option<DeliveryInfo>,

    /// Promised ready time.
    #[serde(default)]
    pub estimated_ready: Option<DateTime>,

    /// Order notes.
    #[serde(default)]
    pub notes: Option<String>,

    /// Lines, added in order.
    pub lines: Vec<CartFileLine>,
}

impl CartFile {
    /// Parse a YAML cart file.
    ///
    /// # Errors
    ///
    /// Returns [`CartFileError::Yaml`] when the document is malformed.
    pub fn from_yaml(contents: &str) -> Result<Self, CartFileError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Build a cart, pricing each line from `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`CartFileError::UnknownItem`] for an item missing from the
    /// catalog and [`CartFileError::Cart`] for an invalid quantity.
    pub fn into_cart(self, catalog: &Catalog) -> Result<Cart, CartFileError> {
        let mut cart = Cart::new();

        for line in self.lines {
            let item = catalog
                .get(line.item_id.as_str())
                .ok_or_else(|| CartFileError::UnknownItem(line.item_id.clone()))?;

            cart.add_item_quantity(item, line.service_type, line.quantity)?;
        }

        cart.set_customer(self.customer);
        cart.set_manual_discount(self.manual_discount);
        cart.set_delivery(self.delivery);
        cart.set_estimated_ready(self.estimated_ready);
        cart.set_notes(self.notes);

        Ok(cart)
    }
}
