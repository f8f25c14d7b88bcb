//! Orders
//!
//! Payloads sent to, and records returned by, the order and payment
//! collaborators.

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::{
    cart::Cart,
    catalog::{ItemId, ServiceType},
    checkout::PaymentMethod,
    customers::{Customer, CustomerId},
    delivery::DeliveryInfo,
    ids::TypedId,
    lifecycle::{Fulfilment, OrderStatus, PaymentStatus},
    pricing::{Capabilities, CartTotals},
};

/// Order id.
pub type OrderId = TypedId<Order>;

/// Payment id.
pub type PaymentId = TypedId<Payment>;

/// One priced line on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Catalog id.
    pub item_id: ItemId,

    /// Name at the time of sale.
    pub item_name: String,

    /// Units.
    pub quantity: u32,

    /// Service tier.
    pub service_type: ServiceType,

    /// Price per unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// `quantity * unit_price`, before discounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,

    /// Volume discount taken off this line.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount_applied: Decimal,
}

/// Order-creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    /// Customer id.
    pub customer_id: CustomerId,

    /// Customer name at the time of sale.
    pub customer_name: String,

    /// Customer phone at the time of sale.
    pub customer_phone: String,

    /// Lines.
    pub items: Vec<OrderItem>,

    /// Sum of line totals.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Tax charged.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,

    /// Volume, customer and manual discounts combined.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    /// Amount due.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Free-text notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Promised ready time.
    #[serde(
        serialize_with = "ready_time::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_ready: Option<DateTime>,

    /// Pickup/delivery schedule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_info: Option<DeliveryInfo>,
}

/// Build the order-creation payload from a priced cart.
///
/// `customer` is the one returned by
/// [`validate_checkout`](crate::checkout::validate_checkout). Delivery is only
/// attached when the shop has delivery enabled.
pub fn build_order(
    cart: &Cart,
    customer: &Customer,
    totals: &CartTotals,
    capabilities: Capabilities,
) -> NewOrder {
    let items = cart
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| OrderItem {
            item_id: line.item_id().clone(),
            item_name: line.item_name().to_string(),
            quantity: line.quantity(),
            service_type: line.service_type(),
            unit_price: line.unit_price(),
            total_price: line.line_total(),
            discount_applied: totals
                .lines
                .get(index)
                .map_or(Decimal::ZERO, |discount| discount.amount),
        })
        .collect();

    NewOrder {
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        customer_phone: customer.phone.clone(),
        items,
        subtotal: totals.subtotal,
        tax: totals.tax,
        discount: totals.total_discount(),
        total: totals.total,
        notes: cart.notes().map(ToString::to_string),
        estimated_ready: cart.estimated_ready(),
        delivery_info: cart
            .delivery()
            .filter(|_| capabilities.delivery)
            .cloned(),
    }
}

/// Order record returned by the order service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order id.
    pub id: OrderId,

    /// Human-facing ticket number.
    pub order_number: String,

    /// Customer id.
    pub customer_id: CustomerId,

    /// Customer name.
    #[serde(default)]
    pub customer_name: String,

    /// Customer phone.
    #[serde(default)]
    pub customer_phone: String,

    /// Lines.
    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Sum of line totals.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Tax charged.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tax: Decimal,

    /// Discounts combined.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    /// Amount due.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Cleaning status.
    pub status: OrderStatus,

    /// Payment status.
    #[serde(default)]
    pub payment_status: PaymentStatus,

    /// Method used to pay, once known.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,

    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,

    /// Promised ready time, as stored by the service.
    #[serde(default)]
    pub estimated_ready: Option<String>,

    /// Pickup/delivery schedule.
    #[serde(default)]
    pub delivery_info: Option<DeliveryInfo>,
}

impl Order {
    /// Path the order follows, from its delivery schedule.
    pub fn fulfilment(&self) -> Fulfilment {
        match &self.delivery_info {
            Some(info) if info.kind.returns_to_customer() => Fulfilment::Delivery,
            _ => Fulfilment::Collection,
        }
    }
}

/// Status-update request.
///
/// The status is sent under the order service's name for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    /// Target status.
    #[serde(serialize_with = "service_status")]
    pub status: OrderStatus,
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "signature dictated by serde's serialize_with."
)]
fn service_status<S: Serializer>(status: &OrderStatus, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(status.service_name())
}

/// Payment-initiation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPayment {
    /// Order being paid.
    pub order_id: OrderId,

    /// Amount, the order total.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Method.
    pub payment_method: PaymentMethod,
}

impl NewPayment {
    /// Payment of the full order total.
    pub fn for_order(order: &Order, payment_method: PaymentMethod) -> Self {
        Self {
            order_id: order.id.clone(),
            amount: order.total,
            payment_method,
        }
    }
}

/// Payment record returned by the payment collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment id.
    pub id: PaymentId,

    /// Order paid.
    pub order_id: OrderId,

    /// Amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Method.
    pub payment_method: PaymentMethod,

    /// Outcome so far.
    pub status: PaymentStatus,

    /// Hosted checkout page for card payments; opened verbatim.
    #[serde(default)]
    pub checkout_url: Option<String>,
}

mod ready_time {
    use jiff::civil::DateTime;
    use serde::Serializer;

    const FORMAT: &str = "%Y-%m-%d %H:%M";

    #[expect(
        clippy::ref_option,
        reason = "signature dictated by serde's serialize_with."
    )]
    pub(super) fn serialize<S: Serializer>(
        value: &Option<DateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ready) => serializer.collect_str(&ready.strftime(FORMAT)),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::{
        catalog::{Catalog, CatalogItem, ServicePrices, VolumeDiscountRule},
        delivery::DeliveryType,
        lifecycle::next_status,
        pricing::PricingConfig,
    };

    use super::*;

    fn priced_cart() -> TestResult<(Cart, Catalog)> {
        let shirt = CatalogItem::new("shirt", "Shirt", "tops", ServicePrices::flat(dec!(5.00)))
            .with_volume_discounts([VolumeDiscountRule::new(2, dec!(10))]);
        let mut cart = Cart::new();

        cart.add_item_quantity(&shirt, ServiceType::Regular, 2)?;
        cart.set_customer(Some(Customer::new("c-1", "Ada", "555-0100")));

        Ok((cart, Catalog::from_items([shirt])))
    }

    #[test]
    fn payload_carries_lines_and_totals() -> TestResult {
        let (mut cart, catalog) = priced_cart()?;
        cart.set_manual_discount(dec!(1));
        cart.set_estimated_ready(Some(date(2024, 12, 20).at(10, 0, 0, 0)));

        let config = PricingConfig::new(dec!(0.08), rusty_money::iso::USD, Capabilities::default())?;
        let totals = cart.totals(&catalog, &config);
        let customer = Customer::new("c-1", "Ada", "555-0100");

        let order = build_order(&cart, &customer, &totals, config.capabilities());

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items.first().map(|i| i.discount_applied), Some(dec!(1.00)));
        assert_eq!(order.subtotal, dec!(10.00));
        assert_eq!(order.discount, dec!(2.00));
        assert_eq!(order.tax, dec!(0.64));
        assert_eq!(order.total, dec!(8.64));

        let value = serde_json::to_value(&order)?;

        assert_eq!(value["customer_id"], "c-1");
        assert_eq!(value["items"][0]["service_type"], "regular");
        assert_eq!(value["items"][0]["unit_price"], 5.0);
        assert_eq!(value["estimated_ready"], "2024-12-20 10:00");
        assert!(value.get("delivery_info").is_none());
        assert!(value.get("notes").is_none());

        Ok(())
    }

    #[test]
    fn delivery_dropped_when_capability_disabled() -> TestResult {
        let (mut cart, catalog) = priced_cart()?;
        cart.set_delivery(Some(DeliveryInfo::new(DeliveryType::Delivery, dec!(3))));

        let capabilities = Capabilities {
            delivery: false,
            ..Capabilities::default()
        };
        let config = PricingConfig::new(Decimal::ZERO, rusty_money::iso::USD, capabilities)?;
        let totals = cart.totals(&catalog, &config);
        let customer = Customer::new("c-1", "Ada", "555-0100");

        let order = build_order(&cart, &customer, &totals, capabilities);

        assert_eq!(order.delivery_info, None);
        assert_eq!(order.total, dec!(9.00));

        Ok(())
    }

    #[test]
    fn order_record_parses_with_legacy_status() -> TestResult {
        let order: Order = serde_json::from_str(
            r#"{
                "id": "o-1",
                "order_number": "DC2412200A1B",
                "customer_id": "c-1",
                "total": 10.8,
                "status": "received",
                "payment_status": "pending",
                "delivery_info": {"type": "both", "delivery_fee": 3.0}
            }"#,
        )?;

        assert_eq!(order.status, OrderStatus::Cleaning);
        assert_eq!(order.total, dec!(10.8));
        assert_eq!(order.fulfilment(), Fulfilment::Delivery);

        Ok(())
    }

    #[test]
    fn pickup_only_orders_are_collected() -> TestResult {
        let order: Order = serde_json::from_str(
            r#"{
                "id": "o-2",
                "order_number": "DC2412200A1C",
                "customer_id": "c-1",
                "total": 5,
                "status": "ready",
                "delivery_info": {"type": "pickup"}
            }"#,
        )?;

        assert_eq!(order.fulfilment(), Fulfilment::Collection);

        Ok(())
    }

    #[test]
    fn status_update_uses_service_names() -> TestResult {
        let collected = next_status(OrderStatus::Ready, Fulfilment::Collection)
            .ok_or("ready should advance")?;
        let ready = next_status(OrderStatus::Cleaning, Fulfilment::Collection)
            .ok_or("cleaning should advance")?;

        assert_eq!(
            serde_json::to_value(StatusUpdate { status: collected })?,
            serde_json::json!({"status": "picked_up"})
        );
        assert_eq!(
            serde_json::to_value(StatusUpdate { status: ready })?,
            serde_json::json!({"status": "ready"})
        );
        assert_eq!(
            serde_json::to_value(StatusUpdate { status: OrderStatus::Cancelled })?,
            serde_json::json!({"status": "cancelled"})
        );

        Ok(())
    }

    #[test]
    fn payment_request_uses_order_total() -> TestResult {
        let order: Order = serde_json::from_str(
            r#"{"id": "o-3", "order_number": "N", "customer_id": "c", "total": 9.234, "status": "cleaning"}"#,
        )?;

        let payment = NewPayment::for_order(&order, PaymentMethod::PayOnCollection);
        let value = serde_json::to_value(&payment)?;

        assert_eq!(payment.amount, dec!(9.234));
        assert_eq!(value["payment_method"], "pay_on_collection");
        assert_eq!(value["order_id"], "o-3");

        Ok(())
    }
}
