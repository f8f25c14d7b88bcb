//! Cart
//!
//! The in-progress order at the counter: priced lines plus the selections
//! (customer, manual discount, delivery, ready time, notes) that travel with
//! them to checkout.

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    catalog::{CatalogItem, ItemId, ServiceType},
    customers::Customer,
    delivery::DeliveryInfo,
};

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No line exists at the given index.
    #[error("no cart line at index {0}")]
    LineNotFound(usize),

    /// Quantities must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Quantity would exceed the representable range.
    #[error("quantity overflow on line {0}")]
    QuantityOverflow(usize),

    /// Line total would exceed the representable amount.
    #[error("line total overflow on line {0}")]
    AmountOverflow(usize),
}

/// One `(item, service tier)` pairing in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    item_id: ItemId,
    item_name: String,
    service_type: ServiceType,
    quantity: u32,
    unit_price: Decimal,
    line_total: Decimal,
}

impl CartLine {
    fn new(
        item: &CatalogItem,
        service_type: ServiceType,
        quantity: u32,
        index: usize,
    ) -> Result<Self, CartError> {
        let unit_price = item.price(service_type);

        Ok(Self {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            service_type,
            quantity,
            unit_price,
            line_total: line_total(unit_price, quantity, index)?,
        })
    }

    fn matches(&self, item_id: &ItemId, service_type: ServiceType) -> bool {
        self.item_id == *item_id && self.service_type == service_type
    }

    fn set_quantity(&mut self, quantity: u32, index: usize) -> Result<(), CartError> {
        self.line_total = line_total(self.unit_price, quantity, index)?;
        self.quantity = quantity;

        Ok(())
    }

    /// Catalog id the line was added from.
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// Name captured when the line was added.
    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    /// Service tier.
    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    /// Units on the line; always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price snapshot taken when the line was added.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// `quantity * unit_price`.
    pub fn line_total(&self) -> Decimal {
        self.line_total
    }
}

fn line_total(unit_price: Decimal, quantity: u32, index: usize) -> Result<Decimal, CartError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(CartError::AmountOverflow(index))
}

/// Cart and the checkout selections that go with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    customer: Option<Customer>,
    manual_discount: Decimal,
    delivery: Option<DeliveryInfo>,
    estimated_ready: Option<DateTime>,
    notes: Option<String>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item` at the given tier.
    ///
    /// Re-adding an existing `(item, tier)` pair increments its quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if the line is already at the
    /// maximum quantity and [`CartError::AmountOverflow`] if its total would
    /// overflow.
    pub fn add_item(&mut self, item: &CatalogItem, service_type: ServiceType) -> Result<(), CartError> {
        self.add_item_quantity(item, service_type, 1)
    }

    /// Add `quantity` units of `item` at the given tier.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity,
    /// [`CartError::QuantityOverflow`] if the line quantity would overflow and
    /// [`CartError::AmountOverflow`] if the line total would. The cart is
    /// unchanged on error.
    pub fn add_item_quantity(
        &mut self,
        item: &CatalogItem,
        service_type: ServiceType,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let existing = self
            .lines
            .iter_mut()
            .enumerate()
            .find(|(_, line)| line.matches(&item.id, service_type));

        match existing {
            Some((index, line)) => {
                let quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityOverflow(index))?;

                line.set_quantity(quantity, index)?;
            }
            None => {
                let line = CartLine::new(item, service_type, quantity, self.lines.len())?;
                self.lines.push(line);
            }
        }

        Ok(())
    }

    /// Adjust a line's quantity by `delta`; a result of zero or less removes
    /// the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown index and
    /// [`CartError::QuantityOverflow`] or [`CartError::AmountOverflow`] if the
    /// quantity or line total would overflow.
    pub fn change_quantity(&mut self, index: usize, delta: i64) -> Result<(), CartError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::LineNotFound(index))?;

        let quantity = i64::from(line.quantity).saturating_add(delta);

        if quantity <= 0 {
            self.lines.remove(index);

            return Ok(());
        }

        let quantity = u32::try_from(quantity).map_err(|_err| CartError::QuantityOverflow(index))?;
        line.set_quantity(quantity, index)
    }

    /// Remove a line unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown index.
    pub fn remove_line(&mut self, index: usize) -> Result<CartLine, CartError> {
        if index >= self.lines.len() {
            return Err(CartError::LineNotFound(index));
        }

        Ok(self.lines.remove(index))
    }

    /// Reset lines, customer, manual discount, delivery, ready time and notes.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Current lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Selected customer.
    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// Select (or deselect) the customer.
    pub fn set_customer(&mut self, customer: Option<Customer>) {
        self.customer = customer;
    }

    /// Operator-entered flat discount.
    pub fn manual_discount(&self) -> Decimal {
        self.manual_discount
    }

    /// Set the flat discount; negative amounts are clamped to zero.
    pub fn set_manual_discount(&mut self, amount: Decimal) {
        self.manual_discount = amount.max(Decimal::ZERO);
    }

    /// Delivery schedule, present when delivery is enabled.
    pub fn delivery(&self) -> Option<&DeliveryInfo> {
        self.delivery.as_ref()
    }

    /// Enable delivery with the given schedule, or disable it with `None`.
    pub fn set_delivery(&mut self, delivery: Option<DeliveryInfo>) {
        self.delivery = delivery;
    }

    /// When the order is promised to be ready.
    pub fn estimated_ready(&self) -> Option<DateTime> {
        self.estimated_ready
    }

    /// Set the promised ready time.
    pub fn set_estimated_ready(&mut self, ready: Option<DateTime>) {
        self.estimated_ready = ready;
    }

    /// Free-text order notes.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Set order notes; blank notes are dropped.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes.filter(|notes| !notes.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::{
        catalog::ServicePrices,
        delivery::{DeliveryInfo, DeliveryType},
    };

    use super::*;

    fn shirt() -> CatalogItem {
        CatalogItem::new(
            "shirt",
            "Shirt",
            "tops",
            ServicePrices {
                regular: dec!(5.00),
                express: dec!(8.00),
                delicate: dec!(10.00),
            },
        )
    }

    fn trousers() -> CatalogItem {
        CatalogItem::new("trousers", "Trousers", "bottoms", ServicePrices::flat(dec!(7.50)))
    }

    #[test]
    fn adding_same_pair_twice_increments_quantity() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&shirt(), ServiceType::Regular)?;
        cart.add_item(&shirt(), ServiceType::Regular)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines().first().map(CartLine::quantity), Some(2));
        assert_eq!(cart.subtotal(), dec!(10.00));

        Ok(())
    }

    #[test]
    fn different_service_tier_is_a_separate_line() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&shirt(), ServiceType::Regular)?;
        cart.add_item(&shirt(), ServiceType::Express)?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal(), dec!(13.00));

        Ok(())
    }

    #[test]
    fn unit_price_is_a_snapshot() -> TestResult {
        let mut item = shirt();
        let mut cart = Cart::new();

        cart.add_item(&item, ServiceType::Regular)?;
        item.prices.regular = dec!(6.00);
        cart.add_item(&item, ServiceType::Regular)?;

        assert_eq!(cart.lines().first().map(CartLine::unit_price), Some(dec!(5.00)));
        assert_eq!(cart.subtotal(), dec!(10.00));

        Ok(())
    }

    #[test]
    fn add_zero_quantity_is_rejected() {
        let mut cart = Cart::new();

        assert_eq!(
            cart.add_item_quantity(&shirt(), ServiceType::Regular, 0),
            Err(CartError::InvalidQuantity)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn add_overflowing_quantity_is_rejected() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item_quantity(&shirt(), ServiceType::Regular, u32::MAX)?;

        assert_eq!(
            cart.add_item(&shirt(), ServiceType::Regular),
            Err(CartError::QuantityOverflow(0))
        );

        Ok(())
    }

    #[test]
    fn overflowing_line_total_is_rejected() -> TestResult {
        let pricey = CatalogItem::new(
            "gown",
            "Couture Gown",
            "formal",
            ServicePrices::flat(Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0)),
        );
        let mut cart = Cart::new();

        assert_eq!(
            cart.add_item_quantity(&pricey, ServiceType::Regular, 1_000_000_000),
            Err(CartError::AmountOverflow(0))
        );
        assert!(cart.is_empty());

        cart.add_item(&pricey, ServiceType::Regular)?;

        assert_eq!(
            cart.change_quantity(0, 999_999_999),
            Err(CartError::AmountOverflow(0))
        );
        assert_eq!(cart.lines().first().map(CartLine::quantity), Some(1));
        assert_eq!(
            cart.add_item_quantity(&pricey, ServiceType::Regular, 999_999_999),
            Err(CartError::AmountOverflow(0))
        );
        assert_eq!(cart.subtotal(), pricey.prices.regular);

        Ok(())
    }

    #[test]
    fn change_quantity_recomputes_line_total() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&trousers(), ServiceType::Regular)?;
        cart.change_quantity(0, 3)?;

        assert_eq!(cart.lines().first().map(CartLine::quantity), Some(4));
        assert_eq!(cart.lines().first().map(CartLine::line_total), Some(dec!(30.00)));

        Ok(())
    }

    #[test]
    fn change_quantity_to_zero_removes_line() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&shirt(), ServiceType::Regular)?;
        cart.add_item(&trousers(), ServiceType::Regular)?;
        cart.change_quantity(0, -1)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.lines().first().map(|line| line.item_id().as_str()),
            Some("trousers")
        );

        Ok(())
    }

    #[test]
    fn change_quantity_below_zero_removes_line() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&shirt(), ServiceType::Regular)?;
        cart.change_quantity(0, -10)?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn change_quantity_unknown_index_errors() {
        let mut cart = Cart::new();

        assert_eq!(cart.change_quantity(3, 1), Err(CartError::LineNotFound(3)));
    }

    #[test]
    fn remove_line_is_unconditional() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item_quantity(&shirt(), ServiceType::Regular, 5)?;
        let removed = cart.remove_line(0)?;

        assert_eq!(removed.quantity(), 5);
        assert!(cart.is_empty());
        assert_eq!(cart.remove_line(0), Err(CartError::LineNotFound(0)));

        Ok(())
    }

    #[test]
    fn manual_discount_is_clamped() {
        let mut cart = Cart::new();

        cart.set_manual_discount(dec!(-4));

        assert_eq!(cart.manual_discount(), Decimal::ZERO);
    }

    #[test]
    fn blank_notes_are_dropped() {
        let mut cart = Cart::new();

        cart.set_notes(Some("   ".to_string()));
        assert_eq!(cart.notes(), None);

        cart.set_notes(Some("extra starch".to_string()));
        assert_eq!(cart.notes(), Some("extra starch"));
    }

    #[test]
    fn clear_resets_every_selection() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&shirt(), ServiceType::Regular)?;
        cart.set_customer(Some(Customer::new("c-1", "Ada", "555-0100")));
        cart.set_manual_discount(dec!(2));
        cart.set_delivery(Some(DeliveryInfo::new(DeliveryType::Delivery, dec!(3))));
        cart.set_estimated_ready(Some(date(2024, 12, 20).at(10, 0, 0, 0)));
        cart.set_notes(Some("no starch".to_string()));

        cart.clear();

        assert_eq!(cart, Cart::new());

        Ok(())
    }
}
