//! Catalog collaborator.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use valet::catalog::{Catalog, CatalogItem};

use super::{ApiClient, ApiError};

/// HTTP catalog collaborator.
#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    client: ApiClient,
}

impl HttpCatalogService {
    /// Create a catalog service over the shared client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    #[tracing::instrument(name = "catalog.fetch", skip(self), err)]
    async fn fetch_catalog(&self) -> Result<Catalog, ApiError> {
        let items: Vec<CatalogItem> = self
            .client
            .send(self.client.request(Method::GET, "/items"))
            .await?;

        let catalog = Catalog::from_items(items);

        tracing::debug!(item_count = catalog.len(), "fetched catalog");

        Ok(catalog)
    }
}

#[automock]
#[async_trait]
/// Source of the item catalog.
pub trait CatalogService: Send + Sync {
    /// Fetch the item tree and flatten it into a lookup.
    async fn fetch_catalog(&self) -> Result<Catalog, ApiError>;
}
