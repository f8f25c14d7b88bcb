//! Order collaborator.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use valet::{
    delivery::DeliveryInfo,
    lifecycle::OrderStatus,
    orders::{NewOrder, Order, OrderId, StatusUpdate},
};

use super::{ApiClient, ApiError};

/// HTTP order collaborator.
#[derive(Debug, Clone)]
pub struct HttpOrdersService {
    client: ApiClient,
}

impl HttpOrdersService {
    /// Create an order service over the shared client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrdersService for HttpOrdersService {
    #[tracing::instrument(
        name = "orders.create",
        skip(self, order),
        fields(customer_id = %order.customer_id, line_count = order.items.len()),
        err
    )]
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        let created: Order = self
            .client
            .send(self.client.request(Method::POST, "/orders").json(order))
            .await?;

        tracing::info!(order_id = %created.id, order_number = %created.order_number, "created order");

        Ok(created)
    }

    #[tracing::instrument(name = "orders.get", skip(self), fields(order_id = %id), err)]
    async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.client
            .send(self.client.request(Method::GET, &format!("/orders/{id}")))
            .await
    }

    #[tracing::instrument(
        name = "orders.update_status",
        skip(self),
        fields(order_id = %id, status = %status),
        err
    )]
    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        let request = self
            .client
            .request(Method::PUT, &format!("/orders/{id}/status"))
            .json(&StatusUpdate { status });

        self.client.send(request).await
    }

    #[tracing::instrument(name = "orders.update_delivery", skip(self, delivery), fields(order_id = %id), err)]
    async fn update_delivery(
        &self,
        id: &OrderId,
        delivery: &DeliveryInfo,
    ) -> Result<Order, ApiError> {
        let request = self
            .client
            .request(Method::PUT, &format!("/orders/{id}/delivery"))
            .json(delivery);

        self.client.send(request).await
    }
}

#[automock]
#[async_trait]
/// Order creation and updates.
pub trait OrdersService: Send + Sync {
    /// Create an order; the service assigns its id, number and initial status.
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError>;

    /// Fetch a single order.
    async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError>;

    /// Move an order to `status`.
    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, ApiError>;

    /// Replace an order's pickup/delivery schedule.
    async fn update_delivery(
        &self,
        id: &OrderId,
        delivery: &DeliveryInfo,
    ) -> Result<Order, ApiError>;
}
