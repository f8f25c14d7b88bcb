//! Integration tests for checkout gating, order payloads and lifecycle moves.

use jiff::civil::date;
use rust_decimal_macros::dec;
use rusty_money::iso::GBP;
use testresult::TestResult;

use valet::prelude::*;

const METHODS: [PaymentMethod; 5] = [
    PaymentMethod::Cash,
    PaymentMethod::Card,
    PaymentMethod::BankTransfer,
    PaymentMethod::PayOnCollection,
    PaymentMethod::Invoice,
];

fn catalog() -> TestResult<Catalog> {
    Ok(Catalog::from_yaml(include_str!("fixtures/catalog.yml"))?)
}

#[test]
fn blacklisted_customer_never_reaches_order_building() -> TestResult {
    let catalog = catalog()?;
    let mut blacklisted = Customer::new("c-9", "Mallory", "555-0199").business();
    blacklisted.is_blacklisted = true;

    for quantity in [1, 3, 12] {
        for method in METHODS {
            let mut cart = Cart::new();
            let item = catalog.get("trousers").ok_or("missing trousers")?;
            cart.add_item_quantity(item, ServiceType::Express, quantity)?;
            cart.set_customer(Some(blacklisted.clone()));

            let outcome = validate_checkout(&cart, method, Capabilities::default());

            assert_eq!(
                outcome,
                Err(CheckoutRejection::Blacklisted("Mallory".to_string())),
                "{method} x{quantity}"
            );
        }
    }

    Ok(())
}

#[test]
fn accepted_cart_builds_order_from_its_totals() -> TestResult {
    let catalog = catalog()?;
    let config = PricingConfig::new(dec!(0.2), GBP, Capabilities::default())?;
    let mut cart = Cart::new();

    let shirt = catalog.get("shirt").ok_or("missing shirt")?;
    cart.add_item_quantity(shirt, ServiceType::Regular, 3)?;
    cart.set_customer(Some(Customer::new("c-1", "Ada", "555-0100")));
    cart.set_notes(Some("light starch".to_string()));
    cart.set_estimated_ready(Some(date(2024, 12, 20).at(10, 0, 0, 0)));

    let customer = validate_checkout(&cart, PaymentMethod::Card, config.capabilities())?;
    let totals = cart.totals(&catalog, &config);
    let order = build_order(&cart, customer, &totals, config.capabilities());

    assert_eq!(order.subtotal, dec!(15.00));
    assert_eq!(order.discount, dec!(1.50));
    assert_eq!(order.tax, dec!(2.70));
    assert_eq!(order.total, dec!(16.20));
    assert_eq!(order.notes.as_deref(), Some("light starch"));
    assert_eq!(
        order.items.first().map(|item| item.discount_applied),
        Some(dec!(1.50))
    );

    Ok(())
}

#[test]
fn collection_orders_move_forward_only() {
    let path = Fulfilment::Collection;

    assert_eq!(next_status(OrderStatus::Cleaning, path), Some(OrderStatus::Ready));
    assert_eq!(next_status(OrderStatus::Ready, path), Some(OrderStatus::Collected));
    assert_eq!(next_status(OrderStatus::Collected, path), None);
    assert_eq!(next_status(OrderStatus::Cancelled, path), None);
}

#[test]
fn walking_the_delivery_path_ends_terminal() {
    let mut status = OrderStatus::INITIAL;
    let mut visited = vec![status];

    while let Some(next) = next_status(status, Fulfilment::Delivery) {
        status = next;
        visited.push(next);
    }

    assert_eq!(visited, Fulfilment::Delivery.path());
    assert!(status.is_terminal());
    assert_eq!(cancel(status), None);
}
