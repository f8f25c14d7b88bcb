//! Valet prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::{
        Catalog, CatalogError, CatalogItem, ItemId, ServicePrices, ServiceType,
        VolumeDiscountRule,
    },
    checkout::{CheckoutRejection, PaymentMethod, validate_checkout},
    customers::{Customer, CustomerId, CustomerType},
    delivery::{Address, DeliveryInfo, DeliveryType},
    invoices::{InvoiceDraft, InvoiceError, invoice_due_date, is_overdue},
    lifecycle::{Fulfilment, LifecycleError, OrderStatus, PaymentStatus, cancel, next_status},
    orders::{NewOrder, NewPayment, Order, OrderId, OrderItem, Payment, StatusUpdate, build_order},
    prices::{PriceError, parse_currency, to_money},
    pricing::{Capabilities, CartTotals, PricingConfig, PricingError, compute_totals},
    receipt::{Receipt, ReceiptError},
};
