//! Payment collaborator.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use valet::orders::{NewPayment, Payment};

use super::{ApiClient, ApiError};

/// HTTP payment collaborator.
#[derive(Debug, Clone)]
pub struct HttpPaymentsService {
    client: ApiClient,
}

impl HttpPaymentsService {
    /// Create a payment service over the shared client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentsService for HttpPaymentsService {
    #[tracing::instrument(
        name = "payments.create",
        skip(self, payment),
        fields(order_id = %payment.order_id, method = %payment.payment_method),
        err
    )]
    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, ApiError> {
        let created: Payment = self
            .client
            .send(self.client.request(Method::POST, "/payments").json(payment))
            .await?;

        tracing::info!(payment_id = %created.id, status = ?created.status, "created payment");

        Ok(created)
    }
}

#[automock]
#[async_trait]
/// Payment initiation.
pub trait PaymentsService: Send + Sync {
    /// Initiate payment of an order.
    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, ApiError>;
}
