//! Customers

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{catalog::percent_points, ids::TypedId};

/// Customer id.
pub type CustomerId = TypedId<Customer>;

/// Payment terms applied to business customers that have none on file.
pub const DEFAULT_PAYMENT_TERMS_DAYS: u16 = 30;

/// Account type; only business accounts may be invoiced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    /// Walk-in customer.
    #[default]
    Retail,

    /// Account customer billed on terms.
    Business,
}

/// Customer as returned by the customer search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer id.
    pub id: CustomerId,

    /// Display name.
    pub name: String,

    /// Contact phone number.
    pub phone: String,

    /// Whole-order discount in percent points.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,

    /// Retail or business account.
    #[serde(default)]
    pub customer_type: CustomerType,

    /// Blocks checkout entirely.
    #[serde(default)]
    pub is_blacklisted: bool,

    /// Blocks the pay-on-collection method.
    #[serde(default)]
    pub require_advance_payment: bool,

    /// Invoice terms in days, for business accounts.
    #[serde(default)]
    pub payment_terms: Option<u16>,
}

impl Customer {
    /// Create a retail customer with no discount or restrictions.
    pub fn new(id: impl Into<CustomerId>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
            discount_percent: Decimal::ZERO,
            customer_type: CustomerType::Retail,
            is_blacklisted: false,
            require_advance_payment: false,
            payment_terms: None,
        }
    }

    /// Set the whole-order discount in percent points.
    #[must_use]
    pub fn with_discount_percent(mut self, points: Decimal) -> Self {
        self.discount_percent = points;
        self
    }

    /// Mark as a business account.
    #[must_use]
    pub fn business(mut self) -> Self {
        self.customer_type = CustomerType::Business;
        self
    }

    /// Whole-order discount as a fraction clamped to `[0, 1]`.
    pub fn discount(&self) -> Percentage {
        percent_points(self.discount_percent)
    }

    /// Whether this is a business account.
    pub fn is_business(&self) -> bool {
        self.customer_type == CustomerType::Business
    }

    /// Invoice terms, falling back to [`DEFAULT_PAYMENT_TERMS_DAYS`].
    pub fn payment_terms_days(&self) -> u16 {
        self.payment_terms.unwrap_or(DEFAULT_PAYMENT_TERMS_DAYS)
    }
}
