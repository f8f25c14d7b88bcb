//! Delivery
//!
//! Pickup and delivery scheduling attached to an order. The schedule is
//! independent of the order's cleaning status and can be edited after
//! creation.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// Driver id.
pub type DriverId = TypedId<Driver>;

/// Marker for driver ids.
#[derive(Debug)]
pub struct Driver;

/// Which legs of the journey the shop handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    /// Shop collects soiled items from the customer.
    Pickup,

    /// Shop returns cleaned items to the customer.
    #[default]
    Delivery,

    /// Both legs.
    Both,
}

impl DeliveryType {
    /// Whether cleaned items travel back to the customer.
    pub const fn returns_to_customer(self) -> bool {
        matches!(self, Self::Delivery | Self::Both)
    }
}

/// Postal address for a pickup or delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street and number.
    pub street: String,

    /// City.
    pub city: String,

    /// State or county.
    #[serde(default)]
    pub state: Option<String>,

    /// Postal code.
    pub postal_code: String,

    /// ISO country code.
    #[serde(default = "default_country")]
    pub country: String,

    /// Whether this is the customer's default address.
    #[serde(default)]
    pub is_default: bool,

    /// Short label such as "Home" or "Office".
    #[serde(default = "default_label")]
    pub label: String,
}

fn default_country() -> String {
    "US".to_string()
}

fn default_label() -> String {
    "Home".to_string()
}

/// Schedule and fee for collecting and/or returning an order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeliveryInfo {
    /// Legs handled by the shop.
    #[serde(rename = "type")]
    pub kind: DeliveryType,

    /// Where soiled items are collected from.
    #[serde(default)]
    pub pickup_address: Option<Address>,

    /// Where cleaned items are returned to.
    #[serde(default)]
    pub delivery_address: Option<Address>,

    /// Collection day.
    #[serde(default)]
    pub pickup_date: Option<Date>,

    /// Collection window, e.g. `"09:00-12:00"`.
    #[serde(default)]
    pub pickup_time_slot: Option<String>,

    /// Return day.
    #[serde(default)]
    pub delivery_date: Option<Date>,

    /// Return window.
    #[serde(default)]
    pub delivery_time_slot: Option<String>,

    /// Assigned driver.
    #[serde(default)]
    pub driver_id: Option<DriverId>,

    /// Assigned driver's display name.
    #[serde(default)]
    pub driver_name: Option<String>,

    /// Free-text instructions for the driver.
    #[serde(default)]
    pub delivery_notes: Option<String>,

    /// Flat service charge; not taxed.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
}

impl DeliveryInfo {
    /// Create a schedule of the given kind with a flat fee.
    pub fn new(kind: DeliveryType, fee: Decimal) -> Self {
        Self {
            kind,
            delivery_fee: fee,
            ..Self::default()
        }
    }

    /// Fee, never negative.
    pub fn fee(&self) -> Decimal {
        self.delivery_fee.max(Decimal::ZERO)
    }
}
