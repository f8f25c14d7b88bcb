//! Receipt printing.

use mockall::automock;
use rusty_money::iso::Currency;
use valet::{
    orders::Order,
    receipt::{Receipt, ReceiptError},
};

/// Prints receipts for completed checkouts.
#[automock]
pub trait ReceiptPrinter: Send + Sync {
    /// Print the receipt for `order`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the receipt cannot be rendered or written.
    fn print(&self, order: &Order, currency: &'static Currency) -> Result<(), ReceiptError>;
}

/// Renders receipts as tables and writes them to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReceiptPrinter;

impl LogReceiptPrinter {
    /// Render the receipt text for `order`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if an amount cannot be shown as money.
    pub fn render(order: &Order, currency: &'static Currency) -> Result<String, ReceiptError> {
        let mut out = Vec::new();

        Receipt::from_order(order, currency)?.write_to(&mut out)?;

        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

impl ReceiptPrinter for LogReceiptPrinter {
    fn print(&self, order: &Order, currency: &'static Currency) -> Result<(), ReceiptError> {
        let rendered = Self::render(order, currency)?;

        tracing::info!(order_number = %order.order_number, "receipt\n{rendered}");

        Ok(())
    }
}
