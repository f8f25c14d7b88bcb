//! Order Lifecycle
//!
//! Orders move forward through a fixed path and never skip or reverse:
//!
//! ```text
//! collection: cleaning -> ready -> collected
//! delivery:   cleaning -> ready -> out_for_delivery -> delivered
//! ```
//!
//! Any non-terminal order can be cancelled by an operator.
//!
//! The order service speaks an older vocabulary
//! (`received/processing/.../picked_up`). Those names are accepted on input
//! and mapped onto the canonical statuses. Status updates sent to the service
//! use its names (see [`OrderStatus::service_name`]); everything else uses
//! the canonical names.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when driving an order through its lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The order is at the end of its path, or off it.
    #[error("no forward transition from {0}")]
    NoForwardTransition(OrderStatus),

    /// Terminal orders cannot be cancelled.
    #[error("order is already {0} and cannot be cancelled")]
    NotCancellable(OrderStatus),
}

/// Cleaning progress of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Received at the counter and being cleaned.
    #[serde(alias = "received", alias = "processing")]
    Cleaning,

    /// Clean and waiting for collection or dispatch.
    Ready,

    /// With a driver.
    OutForDelivery,

    /// Returned to the customer by a driver.
    Delivered,

    /// Picked up by the customer at the counter.
    #[serde(alias = "picked_up")]
    Collected,

    /// Cancelled by an operator.
    Cancelled,
}

impl OrderStatus {
    /// Status assigned at order creation.
    pub const INITIAL: Self = Self::Cleaning;

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cleaning => "cleaning",
            Self::Ready => "ready",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Collected => "collected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Name the order service accepts for this status.
    ///
    /// `cleaning` goes out as `received` and `collected` as `picked_up`; the
    /// remaining names are shared by both vocabularies.
    pub const fn service_name(self) -> &'static str {
        match self {
            Self::Cleaning => "received",
            Self::Collected => "picked_up",
            other => other.as_str(),
        }
    }

    /// Whether no further transition is possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Collected | Self::Delivered | Self::Cancelled)
    }

    /// Map a name from either vocabulary onto the canonical status.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cleaning" | "received" | "processing" => Some(Self::Cleaning),
            "ready" => Some(Self::Ready),
            "out_for_delivery" => Some(Self::OutForDelivery),
            "delivered" => Some(Self::Delivered),
            "collected" | "picked_up" => Some(Self::Collected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How cleaned items get back to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fulfilment {
    /// Customer collects from the counter.
    #[default]
    Collection,

    /// A driver returns the items.
    Delivery,
}

impl Fulfilment {
    /// Ordered statuses along this path.
    pub const fn path(self) -> &'static [OrderStatus] {
        match self {
            Self::Collection => &[
                OrderStatus::Cleaning,
                OrderStatus::Ready,
                OrderStatus::Collected,
            ],
            Self::Delivery => &[
                OrderStatus::Cleaning,
                OrderStatus::Ready,
                OrderStatus::OutForDelivery,
                OrderStatus::Delivered,
            ],
        }
    }
}

/// The status following `current` on the given path.
///
/// Returns `None` at the end of the path or for a status not on it (such as
/// `cancelled`); callers should offer no "advance" action in that case.
pub fn next_status(current: OrderStatus, fulfilment: Fulfilment) -> Option<OrderStatus> {
    let path = fulfilment.path();
    let position = path.iter().position(|status| *status == current)?;

    path.get(position + 1).copied()
}

/// `cancelled` if `current` can still be cancelled.
pub fn cancel(current: OrderStatus) -> Option<OrderStatus> {
    (!current.is_terminal()).then_some(OrderStatus::Cancelled)
}

/// Payment progress, owned by the payment collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting payment (including invoices and pay on collection).
    #[default]
    Pending,

    /// Paid in full.
    Completed,

    /// Payment attempt failed.
    Failed,

    /// Paid and refunded.
    Refunded,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn collection_path_moves_forward_only() {
        let path = Fulfilment::Collection;

        assert_eq!(next_status(OrderStatus::Cleaning, path), Some(OrderStatus::Ready));
        assert_eq!(next_status(OrderStatus::Ready, path), Some(OrderStatus::Collected));
        assert_eq!(next_status(OrderStatus::Collected, path), None);
        assert_eq!(next_status(OrderStatus::Cancelled, path), None);
    }

    #[test]
    fn delivery_path_branches_at_ready() {
        let path = Fulfilment::Delivery;

        assert_eq!(
            next_status(OrderStatus::Ready, path),
            Some(OrderStatus::OutForDelivery)
        );
        assert_eq!(
            next_status(OrderStatus::OutForDelivery, path),
            Some(OrderStatus::Delivered)
        );
        assert_eq!(next_status(OrderStatus::Delivered, path), None);
    }

    #[test]
    fn status_off_path_has_no_next() {
        assert_eq!(
            next_status(OrderStatus::OutForDelivery, Fulfilment::Collection),
            None
        );
        assert_eq!(next_status(OrderStatus::Collected, Fulfilment::Delivery), None);
    }

    #[test]
    fn cancel_only_from_non_terminal() {
        assert_eq!(cancel(OrderStatus::Cleaning), Some(OrderStatus::Cancelled));
        assert_eq!(cancel(OrderStatus::OutForDelivery), Some(OrderStatus::Cancelled));
        assert_eq!(cancel(OrderStatus::Collected), None);
        assert_eq!(cancel(OrderStatus::Delivered), None);
        assert_eq!(cancel(OrderStatus::Cancelled), None);
    }

    #[test]
    fn legacy_names_map_to_canonical() -> TestResult {
        let received: OrderStatus = serde_json::from_str("\"received\"")?;
        let processing: OrderStatus = serde_json::from_str("\"processing\"")?;
        let picked_up: OrderStatus = serde_json::from_str("\"picked_up\"")?;

        assert_eq!(received, OrderStatus::Cleaning);
        assert_eq!(processing, OrderStatus::Cleaning);
        assert_eq!(picked_up, OrderStatus::Collected);
        assert_eq!(serde_json::to_string(&picked_up)?, "\"collected\"");

        assert_eq!(OrderStatus::from_name("picked_up"), Some(OrderStatus::Collected));
        assert_eq!(OrderStatus::from_name("lost"), None);

        Ok(())
    }

    #[test]
    fn service_names_map_back_to_the_same_status() {
        assert_eq!(OrderStatus::Collected.service_name(), "picked_up");
        assert_eq!(OrderStatus::Cleaning.service_name(), "received");
        assert_eq!(OrderStatus::OutForDelivery.service_name(), "out_for_delivery");

        for status in Fulfilment::Delivery
            .path()
            .iter()
            .chain(Fulfilment::Collection.path())
            .chain(&[OrderStatus::Cancelled])
        {
            assert_eq!(
                OrderStatus::from_name(status.service_name()),
                Some(*status),
                "{status}"
            );
        }
    }

    #[test]
    fn from_name_round_trips_canonical_names() {
        for status in Fulfilment::Delivery
            .path()
            .iter()
            .chain(Fulfilment::Collection.path())
            .chain(&[OrderStatus::Cancelled])
        {
            assert_eq!(OrderStatus::from_name(status.as_str()), Some(*status));
        }
    }
}
