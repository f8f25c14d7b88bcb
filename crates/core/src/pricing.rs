//! Pricing
//!
//! Derives cart totals from lines, customer and checkout adjustments. The
//! stacking order is fixed:
//!
//! 1. volume discount, per line, from each line's best tier
//! 2. customer discount, on the post-volume base
//! 3. manual discount, flat
//! 4. tax, on what remains
//! 5. delivery fee, after tax and untaxed
//!
//! Everything here is a pure function of its inputs. Settings such as the tax
//! rate are passed in through [`PricingConfig`] rather than read from shared
//! state.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::{Currency, USD};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    catalog::{Catalog, CatalogItem, VolumeDiscountRule},
    customers::Customer,
    delivery::DeliveryInfo,
};

/// Errors raised when building a pricing configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Tax rate must be a fraction in `[0, 1]`.
    #[error("tax rate {0} is outside 0..=1")]
    TaxRateOutOfRange(Decimal),
}

/// Feature switches standing in for the shop's configured edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "independent feature toggles from configuration."
)]
pub struct Capabilities {
    /// Apply per-item volume tiers.
    pub volume_discounts: bool,

    /// Apply the customer's whole-order discount.
    pub customer_discounts: bool,

    /// Allow delivery scheduling and charge its fee.
    pub delivery: bool,

    /// Allow the invoice payment method.
    pub invoice_payment: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            volume_discounts: true,
            customer_discounts: true,
            delivery: true,
            invoice_payment: true,
        }
    }
}

/// Settings the engine prices against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingConfig {
    tax_rate: Decimal,
    currency: &'static Currency,
    capabilities: Capabilities,
}

impl PricingConfig {
    /// Create a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::TaxRateOutOfRange`] unless `tax_rate` is in `[0, 1]`.
    pub fn new(
        tax_rate: Decimal,
        currency: &'static Currency,
        capabilities: Capabilities,
    ) -> Result<Self, PricingError> {
        if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE {
            return Err(PricingError::TaxRateOutOfRange(tax_rate));
        }

        Ok(Self {
            tax_rate,
            currency,
            capabilities,
        })
    }

    /// Tax rate as a fraction.
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Display currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Enabled features.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::ZERO,
            currency: USD,
            capabilities: Capabilities::default(),
        }
    }
}

/// Everything that feeds a totals computation besides the catalog and config.
#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    /// Cart lines.
    pub lines: &'a [CartLine],

    /// Selected customer, if any.
    pub customer: Option<&'a Customer>,

    /// Operator-entered flat discount.
    pub manual_discount: Decimal,

    /// Flat delivery charge.
    pub delivery_fee: Decimal,

    /// Whether the delivery charge applies.
    pub delivery_enabled: bool,
}

impl<'a> From<&'a Cart> for PricingInput<'a> {
    fn from(cart: &'a Cart) -> Self {
        Self {
            lines: cart.lines(),
            customer: cart.customer(),
            manual_discount: cart.manual_discount(),
            delivery_fee: cart.delivery().map_or(Decimal::ZERO, DeliveryInfo::fee),
            delivery_enabled: cart.delivery().is_some(),
        }
    }
}

/// Volume discount applied to a single line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineDiscount {
    /// Applied tier as a fraction (`0.1` is 10%).
    pub rate: Decimal,

    /// `line_total * rate`.
    pub amount: Decimal,
}

/// Derived cart totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CartTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,

    /// Sum of per-line volume discounts.
    pub volume_discount: Decimal,

    /// Customer discount on the post-volume base.
    pub customer_discount: Decimal,

    /// Flat operator discount, as entered (never negative).
    pub manual_discount: Decimal,

    /// Base the tax is computed on, never negative.
    pub taxable_base: Decimal,

    /// `taxable_base * tax_rate`.
    pub tax: Decimal,

    /// Delivery charge, zero when delivery is off.
    pub delivery_fee: Decimal,

    /// Amount due, never negative.
    pub total: Decimal,

    /// Per-line volume discounts, in line order.
    pub lines: Vec<LineDiscount>,
}

impl CartTotals {
    /// Totals of an empty cart.
    pub fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            volume_discount: Decimal::ZERO,
            customer_discount: Decimal::ZERO,
            manual_discount: Decimal::ZERO,
            taxable_base: Decimal::ZERO,
            tax: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            total: Decimal::ZERO,
            lines: Vec::new(),
        }
    }

    /// Discount actually taken off the subtotal.
    ///
    /// A manual discount larger than the remaining base only counts up to that
    /// base.
    pub fn total_discount(&self) -> Decimal {
        self.subtotal - self.taxable_base
    }
}

fn zero_percent() -> Percentage {
    Percentage::from(Decimal::ZERO)
}

/// Volume discount fraction for a line.
///
/// A missing catalog item (deleted after the line was added) has no tiers and
/// yields zero.
pub fn volume_discount_percent_for(line: &CartLine, item: Option<&CatalogItem>) -> Percentage {
    item.and_then(|item| item.best_volume_rule(line.quantity()))
        .map_or_else(zero_percent, VolumeDiscountRule::percentage)
}

/// Compute cart totals.
///
/// Never fails: unknown items price from the line's own snapshot with no
/// volume discount, and over-large discounts clamp the taxable base to zero.
pub fn compute_totals(
    input: &PricingInput<'_>,
    catalog: &Catalog,
    config: &PricingConfig,
) -> CartTotals {
    let capabilities = config.capabilities();

    let lines: Vec<LineDiscount> = input
        .lines
        .iter()
        .map(|line| {
            let percent = if capabilities.volume_discounts {
                volume_discount_percent_for(line, catalog.get(line.item_id().as_str()))
            } else {
                zero_percent()
            };

            LineDiscount {
                rate: percent * Decimal::ONE,
                amount: percent * line.line_total(),
            }
        })
        .collect();

    let subtotal: Decimal = input.lines.iter().map(CartLine::line_total).sum();
    let volume_discount: Decimal = lines.iter().map(|line| line.amount).sum();

    let customer_discount = match input.customer {
        Some(customer) if capabilities.customer_discounts => {
            customer.discount() * (subtotal - volume_discount)
        }
        _ => Decimal::ZERO,
    };

    let manual_discount = input.manual_discount.max(Decimal::ZERO);

    let taxable_base =
        (subtotal - volume_discount - customer_discount - manual_discount).max(Decimal::ZERO);

    let tax = taxable_base * config.tax_rate();

    let delivery_fee = if input.delivery_enabled && capabilities.delivery {
        input.delivery_fee.max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let total = (taxable_base + tax + delivery_fee).max(Decimal::ZERO);

    CartTotals {
        subtotal,
        volume_discount,
        customer_discount,
        manual_discount,
        taxable_base,
        tax,
        delivery_fee,
        total,
        lines,
    }
}

impl Cart {
    /// Price the cart.
    pub fn totals(&self, catalog: &Catalog, config: &PricingConfig) -> CartTotals {
        compute_totals(&PricingInput::from(self), catalog, config)
    }
}
