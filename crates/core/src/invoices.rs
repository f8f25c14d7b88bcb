//! Invoices
//!
//! Business customers paying by invoice settle within their payment terms.

use jiff::{ToSpan, civil::Date};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    checkout::PaymentMethod,
    customers::{Customer, CustomerId},
    orders::{Order, OrderId},
};

/// Errors raised while drafting an invoice.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Only orders paid by invoice get one.
    #[error("order {0} is not paid by invoice")]
    NotInvoiced(OrderId),

    /// The invoice belongs to another customer.
    #[error("order {order} belongs to customer {expected}, not {actual}")]
    CustomerMismatch {
        /// Order being invoiced.
        order: OrderId,

        /// Customer on the order.
        expected: CustomerId,

        /// Customer supplied.
        actual: CustomerId,
    },

    /// Due date falls outside the supported calendar.
    #[error("due date out of range: {0}")]
    DueDate(#[from] jiff::Error),
}

/// Date an invoice issued on `issued` falls due.
///
/// # Errors
///
/// Returns an error if the result overflows the calendar.
pub fn invoice_due_date(issued: Date, terms_days: u16) -> Result<Date, jiff::Error> {
    issued.checked_add(i64::from(terms_days).days())
}

/// Whether an invoice due on `due` is unpaid past its terms on `today`.
pub fn is_overdue(due: Date, today: Date) -> bool {
    today > due
}

/// Invoice computed locally for an order paid on terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceDraft {
    /// Order invoiced.
    pub order_id: OrderId,

    /// Customer billed.
    pub customer_id: CustomerId,

    /// Order total.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Settlement deadline.
    pub due_date: Date,
}

impl InvoiceDraft {
    /// Draft the invoice for `order`, issued on `issued`.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::NotInvoiced`] unless the order was paid by
    /// invoice, [`InvoiceError::CustomerMismatch`] if `customer` is not the
    /// order's customer, and [`InvoiceError::DueDate`] if the due date
    /// overflows.
    pub fn for_order(order: &Order, customer: &Customer, issued: Date) -> Result<Self, InvoiceError> {
        if order.payment_method != Some(PaymentMethod::Invoice) {
            return Err(InvoiceError::NotInvoiced(order.id.clone()));
        }

        if order.customer_id != customer.id {
            return Err(InvoiceError::CustomerMismatch {
                order: order.id.clone(),
                expected: order.customer_id.clone(),
                actual: customer.id.clone(),
            });
        }

        Ok(Self {
            order_id: order.id.clone(),
            customer_id: customer.id.clone(),
            amount: order.total,
            due_date: invoice_due_date(issued, customer.payment_terms_days())?,
        })
    }

    /// Whether the draft is past due on `today`.
    pub fn is_overdue(&self, today: Date) -> bool {
        is_overdue(self.due_date, today)
    }
}
