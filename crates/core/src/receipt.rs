//! Receipt

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Alignment, Style, Theme, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    catalog::ServiceType,
    checkout::PaymentMethod,
    delivery::DeliveryInfo,
    orders::{Order, OrderItem},
    prices::{PriceError, to_money},
    pricing::CartTotals,
};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Amount could not be shown as money.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Writing the rendered receipt failed.
    #[error("failed to write receipt")]
    IO(#[from] io::Error),
}

/// One printed line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    /// Item name.
    pub name: String,

    /// Service tier.
    pub service_type: ServiceType,

    /// Units.
    pub quantity: u32,

    /// Price per unit.
    pub unit_price: Money<'static, Currency>,

    /// Undiscounted line total.
    pub line_total: Money<'static, Currency>,

    /// Volume discount on the line.
    pub discount: Money<'static, Currency>,
}

/// Printable summary of an order or a quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Order number; `None` for a quote.
    pub order_number: Option<String>,

    /// Customer name, if known.
    pub customer_name: Option<String>,

    /// Lines in cart order.
    pub lines: Vec<ReceiptLine>,

    /// Sum of line totals.
    pub subtotal: Money<'static, Currency>,

    /// All discounts combined.
    pub discount: Money<'static, Currency>,

    /// Tax charged.
    pub tax: Money<'static, Currency>,

    /// Delivery charge.
    pub delivery_fee: Money<'static, Currency>,

    /// Amount due.
    pub total: Money<'static, Currency>,

    /// How the order was paid, if it has been.
    pub payment_method: Option<PaymentMethod>,
}

impl Receipt {
    /// Receipt for an order returned by the order service.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Price`] if an amount cannot be shown as money.
    pub fn from_order(order: &Order, currency: &'static Currency) -> Result<Self, ReceiptError> {
        let lines = order
            .items
            .iter()
            .map(|item| order_line(item, currency))
            .collect::<Result<Vec<_>, _>>()?;

        let delivery_fee = order
            .delivery_info
            .as_ref()
            .map_or(Decimal::ZERO, DeliveryInfo::fee);

        Ok(Self {
            order_number: Some(order.order_number.clone()),
            customer_name: Some(order.customer_name.clone()).filter(|name| !name.is_empty()),
            lines,
            subtotal: to_money(order.subtotal, currency)?,
            discount: to_money(order.discount, currency)?,
            tax: to_money(order.tax, currency)?,
            delivery_fee: to_money(delivery_fee, currency)?,
            total: to_money(order.total, currency)?,
            payment_method: order.payment_method,
        })
    }

    /// Quote for a cart that has not been checked out.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Price`] if an amount cannot be shown as money.
    pub fn quote(
        cart: &Cart,
        totals: &CartTotals,
        currency: &'static Currency,
    ) -> Result<Self, ReceiptError> {
        let lines = cart
            .lines()
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let discount = totals
                    .lines
                    .get(index)
                    .map_or(Decimal::ZERO, |line| line.amount);

                quote_line(line, discount, currency)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            order_number: None,
            customer_name: cart.customer().map(|customer| customer.name.clone()),
            lines,
            subtotal: to_money(totals.subtotal, currency)?,
            discount: to_money(totals.total_discount(), currency)?,
            tax: to_money(totals.tax, currency)?,
            delivery_fee: to_money(totals.delivery_fee, currency)?,
            total: to_money(totals.total, currency)?,
            payment_method: None,
        })
    }

    /// Render the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        match &self.order_number {
            Some(number) => writeln!(out, "Order {number}")?,
            None => writeln!(out, "Quote")?,
        }

        if let Some(name) = &self.customer_name {
            writeln!(out, "Customer: {name}")?;
        }

        let mut builder = Builder::default();

        builder.push_record(["Item", "Service", "Qty", "Unit", "Total", "Discount"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.service_type.to_string(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.line_total.to_string(),
                if line.discount.is_zero() {
                    String::new()
                } else {
                    format!("-{}", line.discount)
                },
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Columns::new(2..6), Alignment::right());

        writeln!(out, "{table}")?;

        let mut summary = vec![
            ("Subtotal", self.subtotal.to_string()),
            ("Discount", format!("-{}", self.discount)),
            ("Tax", self.tax.to_string()),
        ];

        if !self.delivery_fee.is_zero() {
            summary.push(("Delivery", self.delivery_fee.to_string()));
        }

        summary.push(("Total", self.total.to_string()));

        let value_width = summary.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in summary {
            writeln!(out, "{label:>10}  {value:>value_width$}")?;
        }

        if let Some(method) = self.payment_method {
            writeln!(out, "{:>10}  {method}", "Paid by")?;
        }

        Ok(())
    }
}

fn order_line(item: &OrderItem, currency: &'static Currency) -> Result<ReceiptLine, ReceiptError> {
    Ok(ReceiptLine {
        name: item.item_name.clone(),
        service_type: item.service_type,
        quantity: item.quantity,
        unit_price: to_money(item.unit_price, currency)?,
        line_total: to_money(item.total_price, currency)?,
        discount: to_money(item.discount_applied, currency)?,
    })
}

fn quote_line(
    line: &CartLine,
    discount: Decimal,
    currency: &'static Currency,
) -> Result<ReceiptLine, ReceiptError> {
    Ok(ReceiptLine {
        name: line.item_name().to_string(),
        service_type: line.service_type(),
        quantity: line.quantity(),
        unit_price: to_money(line.unit_price(), currency)?,
        line_total: to_money(line.line_total(), currency)?,
        discount: to_money(discount, currency)?,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        catalog::{Catalog, CatalogItem, ServicePrices, VolumeDiscountRule},
        customers::Customer,
        pricing::{Capabilities, PricingConfig},
    };

    use super::*;

    fn shirt() -> CatalogItem {
        CatalogItem::new("shirt", "Shirt", "tops", ServicePrices::flat(dec!(5.00)))
            .with_volume_discounts([VolumeDiscountRule::new(2, dec!(10))])
    }

    #[test]
    fn quote_rounds_amounts_for_display() -> TestResult {
        let mut cart = Cart::new();
        cart.add_item_quantity(&shirt(), ServiceType::Regular, 2)?;
        cart.set_customer(Some(
            Customer::new("c-1", "Ada", "555-0100").with_discount_percent(dec!(5)),
        ));

        let config = PricingConfig::new(dec!(0.08), USD, Capabilities::default())?;
        let totals = cart.totals(&Catalog::from_items([shirt()]), &config);
        let receipt = Receipt::quote(&cart, &totals, USD)?;

        assert_eq!(receipt.total, Money::from_minor(923, USD));
        assert_eq!(receipt.discount, Money::from_minor(145, USD));
        assert_eq!(
            receipt.lines.first().map(|line| line.discount),
            Some(Money::from_minor(100, USD))
        );
        assert_eq!(receipt.customer_name.as_deref(), Some("Ada"));

        Ok(())
    }

    #[test]
    fn order_receipt_prints_lines_and_summary() -> TestResult {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "o-1",
            "order_number": "DC2412200A1B",
            "customer_id": "c-1",
            "customer_name": "Ada",
            "items": [{
                "item_id": "shirt",
                "item_name": "Shirt",
                "quantity": 2,
                "service_type": "express",
                "unit_price": 8.0,
                "total_price": 16.0,
                "discount_applied": 0.0
            }],
            "subtotal": 16.0,
            "tax": 1.28,
            "discount": 0.0,
            "total": 17.28,
            "status": "cleaning",
            "payment_method": "cash"
        }))?;

        let receipt = Receipt::from_order(&order, USD)?;
        let mut out = Vec::new();
        receipt.write_to(&mut out)?;
        let printed = String::from_utf8(out)?;

        assert!(printed.contains("Order DC2412200A1B"));
        assert!(printed.contains("Customer: Ada"));
        assert!(printed.contains("Shirt"));
        assert!(printed.contains("express"));
        assert!(printed.contains("Total"));
        assert!(printed.contains("Paid by  cash"));
        assert!(!printed.contains("Delivery"));

        Ok(())
    }
}
