//! Checkout controller.
//!
//! Turns a validated cart into an order and a payment, then hands the order
//! through its lifecycle. Local rejections never reach the network, and any
//! collaborator failure leaves the cart as it was so the operator can retry.

use std::{fmt, sync::Arc};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{Span, info, warn};
use valet::{
    cart::Cart,
    catalog::Catalog,
    checkout::{CheckoutRejection, PaymentMethod, validate_checkout},
    delivery::DeliveryInfo,
    lifecycle::{Fulfilment, LifecycleError, cancel, next_status},
    orders::{NewPayment, Order, OrderId, Payment, build_order},
    pricing::{CartTotals, PricingConfig},
};

use crate::{
    api::{ApiError, OrdersService, PaymentsService},
    receipts::ReceiptPrinter,
};

/// Errors raised by checkout and lifecycle actions.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A local precondition failed; nothing was sent.
    #[error(transparent)]
    Rejected(#[from] CheckoutRejection),

    /// A collaborator call failed.
    #[error(transparent)]
    Collaborator(#[from] ApiError),

    /// The requested status change is not allowed; nothing was sent.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Result of a successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    /// Order as created, with payment progress applied.
    pub order: Order,

    /// Payment as initiated.
    pub payment: Payment,

    /// Totals the order was priced at.
    pub totals: CartTotals,

    /// Hosted checkout page to open for card payments.
    pub redirect_url: Option<String>,

    /// Whether a receipt was printed.
    pub receipt_printed: bool,
}

/// Drives checkout and order lifecycle calls against the collaborators.
#[derive(Clone)]
pub struct CheckoutService {
    orders: Arc<dyn OrdersService>,
    payments: Arc<dyn PaymentsService>,
    printer: Option<Arc<dyn ReceiptPrinter>>,
}

impl fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutService")
            .field("prints_receipts", &self.printer.is_some())
            .finish_non_exhaustive()
    }
}

impl CheckoutService {
    /// Create a checkout service without receipt printing.
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersService>, payments: Arc<dyn PaymentsService>) -> Self {
        Self {
            orders,
            payments,
            printer: None,
        }
    }

    /// Print a receipt after every successful checkout.
    #[must_use]
    pub fn with_printer(mut self, printer: Arc<dyn ReceiptPrinter>) -> Self {
        self.printer = Some(printer);
        self
    }

    /// Check out the cart.
    ///
    /// On success the cart is cleared. On any error the cart is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Rejected`] if a precondition fails and
    /// [`CheckoutError::Collaborator`] if creating the order or payment fails.
    #[tracing::instrument(
        name = "checkout",
        skip(self, cart, config, catalog),
        fields(
            method = %method,
            line_count = cart.len(),
            order_id = tracing::field::Empty
        ),
        err
    )]
    pub async fn checkout(
        &self,
        cart: &mut Cart,
        config: &PricingConfig,
        catalog: &Catalog,
        method: PaymentMethod,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let capabilities = config.capabilities();
        let customer = validate_checkout(cart, method, capabilities)?;
        let totals = cart.totals(catalog, config);
        let payload = build_order(cart, customer, &totals, capabilities);

        let mut order = self.orders.create_order(&payload).await?;

        Span::current().record("order_id", tracing::field::display(&order.id));

        let payment = self
            .payments
            .create_payment(&NewPayment::for_order(&order, method))
            .await
            .inspect_err(|source| {
                warn!(order_id = %order.id, "order created but payment failed: {source}");
            })?;

        order.payment_status = payment.status;
        order.payment_method = Some(method);

        let receipt_printed = self.print_receipt(&order, config.currency());

        let redirect_url = match method {
            PaymentMethod::Card => payment.checkout_url.clone(),
            _ => None,
        };

        cart.clear();

        info!(order_number = %order.order_number, total = %order.total, "checked out");

        Ok(CheckoutOutcome {
            order,
            payment,
            totals,
            redirect_url,
            receipt_printed,
        })
    }

    fn print_receipt(&self, order: &Order, currency: &'static Currency) -> bool {
        let Some(printer) = &self.printer else {
            return false;
        };

        match printer.print(order, currency) {
            Ok(()) => true,
            Err(source) => {
                warn!(order_id = %order.id, "failed to print receipt: {source}");
                false
            }
        }
    }

    /// Move an order one step along its path.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NoForwardTransition`] without calling the
    /// order service when there is no next status, and
    /// [`CheckoutError::Collaborator`] if the update fails.
    #[tracing::instrument(
        name = "advance_order",
        skip(self, order),
        fields(order_id = %order.id, status = %order.status),
        err
    )]
    pub async fn advance_order(
        &self,
        order: &Order,
        fulfilment: Fulfilment,
    ) -> Result<Order, CheckoutError> {
        let next = next_status(order.status, fulfilment)
            .ok_or(LifecycleError::NoForwardTransition(order.status))?;

        let updated = self.orders.update_status(&order.id, next).await?;

        info!(from = %order.status, to = %updated.status, "advanced order");

        Ok(updated)
    }

    /// Cancel a non-terminal order.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotCancellable`] without calling the order
    /// service for terminal orders, and [`CheckoutError::Collaborator`] if
    /// the update fails.
    #[tracing::instrument(
        name = "cancel_order",
        skip(self, order),
        fields(order_id = %order.id, status = %order.status),
        err
    )]
    pub async fn cancel_order(&self, order: &Order) -> Result<Order, CheckoutError> {
        let cancelled =
            cancel(order.status).ok_or(LifecycleError::NotCancellable(order.status))?;

        Ok(self.orders.update_status(&order.id, cancelled).await?)
    }

    /// Replace an order's pickup/delivery schedule; independent of status.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Collaborator`] if the update fails.
    #[tracing::instrument(name = "update_delivery", skip(self, delivery), fields(order_id = %id), err)]
    pub async fn update_delivery(
        &self,
        id: &OrderId,
        delivery: &DeliveryInfo,
    ) -> Result<Order, CheckoutError> {
        Ok(self.orders.update_delivery(id, delivery).await?)
    }
}
