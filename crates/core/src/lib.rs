//! Valet
//!
//! Valet prices dry-cleaning carts at the counter, decides whether a cart may
//! be checked out, and drives orders through their cleaning lifecycle.
//!
//! Amounts are exact [`rust_decimal::Decimal`] values and are only rounded
//! when shown as money.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customers;
pub mod delivery;
pub mod ids;
pub mod invoices;
pub mod lifecycle;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod receipt;
