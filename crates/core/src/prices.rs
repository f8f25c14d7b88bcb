//! Prices
//!
//! Amounts are carried as exact [`Decimal`] values throughout pricing. They are
//! only rounded to minor units when turned into [`Money`] for display.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

/// Errors raised when converting amounts for display.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// Currency code is not one the point of sale is configured for.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Amount could not be represented in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    MinorUnits(Decimal),
}

/// Resolve an ISO currency code to a supported currency.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for codes other than GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, PriceError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(PriceError::UnknownCurrency(other.to_string())),
    }
}

/// Round an exact amount to whole minor units (pence/cents).
///
/// # Errors
///
/// Returns [`PriceError::MinorUnits`] if the amount overflows an `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, PriceError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .ok_or(PriceError::MinorUnits(amount))
}

/// Convert an exact amount into displayable money.
///
/// # Errors
///
/// Returns [`PriceError::MinorUnits`] if the amount overflows an `i64`.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PriceError> {
    Ok(Money::from_minor(to_minor_units(amount)?, currency))
}
