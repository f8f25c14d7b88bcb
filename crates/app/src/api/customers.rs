//! Customer search collaborator.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use valet::customers::{Customer, CustomerId};

use super::{ApiClient, ApiError};

/// HTTP customer search collaborator.
#[derive(Debug, Clone)]
pub struct HttpCustomersService {
    client: ApiClient,
}

impl HttpCustomersService {
    /// Create a customer service over the shared client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CustomersService for HttpCustomersService {
    #[tracing::instrument(name = "customers.search", skip(self), err)]
    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, ApiError> {
        let request = self
            .client
            .request(Method::GET, "/customers")
            .query(&[("search", query)]);

        self.client.send(request).await
    }

    #[tracing::instrument(name = "customers.get", skip(self), fields(customer_id = %id), err)]
    async fn get_customer(&self, id: &CustomerId) -> Result<Customer, ApiError> {
        self.client
            .send(self.client.request(Method::GET, &format!("/customers/{id}")))
            .await
    }
}

#[automock]
#[async_trait]
/// Customer lookup.
pub trait CustomersService: Send + Sync {
    /// Search customers by name or phone.
    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, ApiError>;

    /// Fetch one customer's current record.
    async fn get_customer(&self, id: &CustomerId) -> Result<Customer, ApiError>;
}
