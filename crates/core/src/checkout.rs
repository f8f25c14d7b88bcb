//! Checkout
//!
//! Local preconditions that must hold before any order is sent to the order
//! service. Rules are checked in a fixed order and the first failure wins.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{cart::Cart, customers::Customer, pricing::Capabilities};

/// How the customer settles the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the counter.
    Cash,

    /// Card, via the payment provider's hosted checkout.
    Card,

    /// Bank transfer.
    BankTransfer,

    /// Paid when the customer collects.
    PayOnCollection,

    /// Billed to a business account on terms.
    Invoice,
}

impl PaymentMethod {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::PayOnCollection => "pay_on_collection",
            Self::Invoice => "invoice",
        }
    }

    /// Parse a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "bank_transfer" => Some(Self::BankTransfer),
            "pay_on_collection" => Some(Self::PayOnCollection),
            "invoice" => Some(Self::Invoice),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a checkout was refused before reaching the order service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutRejection {
    /// Nothing to sell.
    #[error("the cart is empty")]
    EmptyCart,

    /// Orders must belong to a customer.
    #[error("select a customer before checking out")]
    NoCustomer,

    /// Customer is barred from ordering.
    #[error("{0} is blacklisted and cannot place orders")]
    Blacklisted(String),

    /// Invoicing is not enabled for this shop.
    #[error("invoice payment is not enabled")]
    InvoiceUnavailable,

    /// Only business accounts may be invoiced.
    #[error("invoice payment is only available to business customers")]
    InvoiceRequiresBusiness,

    /// Customer must pay before work starts.
    #[error("{0} must pay in advance; pay on collection is not allowed")]
    AdvancePaymentRequired(String),
}

/// Check the cart may be turned into an order paid by `method`.
///
/// Returns the selected customer on success.
///
/// # Errors
///
/// Returns the first [`CheckoutRejection`] that applies.
pub fn validate_checkout<'a>(
    cart: &'a Cart,
    method: PaymentMethod,
    capabilities: Capabilities,
) -> Result<&'a Customer, CheckoutRejection> {
    if cart.is_empty() {
        return Err(CheckoutRejection::EmptyCart);
    }

    let customer = cart.customer().ok_or(CheckoutRejection::NoCustomer)?;

    if customer.is_blacklisted {
        return Err(CheckoutRejection::Blacklisted(customer.name.clone()));
    }

    match method {
        PaymentMethod::Invoice if !capabilities.invoice_payment => {
            Err(CheckoutRejection::InvoiceUnavailable)
        }
        PaymentMethod::Invoice if !customer.is_business() => {
            Err(CheckoutRejection::InvoiceRequiresBusiness)
        }
        PaymentMethod::PayOnCollection if customer.require_advance_payment => Err(
            CheckoutRejection::AdvancePaymentRequired(customer.name.clone()),
        ),
        _ => Ok(customer),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::catalog::{CatalogItem, ServicePrices, ServiceType};

    use super::*;

    const ALL_METHODS: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::BankTransfer,
        PaymentMethod::PayOnCollection,
        PaymentMethod::Invoice,
    ];

    fn cart_for(customer: Option<Customer>) -> TestResult<Cart> {
        let mut cart = Cart::new();
        cart.add_item(
            &CatalogItem::new("shirt", "Shirt", "tops", ServicePrices::flat(dec!(5))),
            ServiceType::Regular,
        )?;
        cart.set_customer(customer);

        Ok(cart)
    }

    fn retail() -> Customer {
        Customer::new("c-1", "Ada", "555-0100")
    }

    #[test]
    fn empty_cart_is_rejected_first() {
        let mut cart = Cart::new();
        cart.set_customer(Some(retail()));

        assert_eq!(
            validate_checkout(&cart, PaymentMethod::Cash, Capabilities::default()),
            Err(CheckoutRejection::EmptyCart)
        );
    }

    #[test]
    fn missing_customer_is_rejected() -> TestResult {
        let cart = cart_for(None)?;

        assert_eq!(
            validate_checkout(&cart, PaymentMethod::Cash, Capabilities::default()),
            Err(CheckoutRejection::NoCustomer)
        );

        Ok(())
    }

    #[test]
    fn blacklisted_customer_is_rejected_for_every_method() -> TestResult {
        let mut customer = retail().business();
        customer.is_blacklisted = true;
        let cart = cart_for(Some(customer))?;

        for method in ALL_METHODS {
            assert_eq!(
                validate_checkout(&cart, method, Capabilities::default()),
                Err(CheckoutRejection::Blacklisted("Ada".to_string())),
                "{method} should be rejected"
            );
        }

        Ok(())
    }

    #[test]
    fn invoice_requires_business_customer() -> TestResult {
        let retail_cart = cart_for(Some(retail()))?;
        let business_cart = cart_for(Some(retail().business()))?;

        assert_eq!(
            validate_checkout(&retail_cart, PaymentMethod::Invoice, Capabilities::default()),
            Err(CheckoutRejection::InvoiceRequiresBusiness)
        );
        assert!(
            validate_checkout(&business_cart, PaymentMethod::Invoice, Capabilities::default())
                .is_ok()
        );

        Ok(())
    }

    #[test]
    fn invoice_rejected_when_disabled() -> TestResult {
        let cart = cart_for(Some(retail().business()))?;
        let capabilities = Capabilities {
            invoice_payment: false,
            ..Capabilities::default()
        };

        assert_eq!(
            validate_checkout(&cart, PaymentMethod::Invoice, capabilities),
            Err(CheckoutRejection::InvoiceUnavailable)
        );

        Ok(())
    }

    #[test]
    fn advance_payment_blocks_pay_on_collection_only() -> TestResult {
        let mut customer = retail();
        customer.require_advance_payment = true;
        let cart = cart_for(Some(customer))?;

        assert_eq!(
            validate_checkout(&cart, PaymentMethod::PayOnCollection, Capabilities::default()),
            Err(CheckoutRejection::AdvancePaymentRequired("Ada".to_string()))
        );
        assert!(validate_checkout(&cart, PaymentMethod::Cash, Capabilities::default()).is_ok());

        Ok(())
    }

    #[test]
    fn method_names_round_trip() {
        for method in ALL_METHODS {
            assert_eq!(PaymentMethod::from_name(method.as_str()), Some(method));
        }
        assert_eq!(PaymentMethod::from_name("cheque"), None);
    }
}
