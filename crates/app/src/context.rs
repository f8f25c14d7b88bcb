//! App Context

use std::{fmt, sync::Arc};

use crate::{
    api::{
        ApiClient, CatalogService, CustomersService, HttpCatalogService, HttpCustomersService,
        HttpOrdersService, HttpPaymentsService, HttpSettingsService, OrdersService,
        PaymentsService, SettingsService,
    },
    checkout::CheckoutService,
    config::{ApiConfig, ConfigError},
    receipts::{LogReceiptPrinter, ReceiptPrinter},
};

/// Collaborators shared by every command.
#[derive(Clone)]
pub struct AppContext {
    /// Item catalog source.
    pub catalog: Arc<dyn CatalogService>,

    /// Customer lookup.
    pub customers: Arc<dyn CustomersService>,

    /// Shop settings source.
    pub settings: Arc<dyn SettingsService>,

    /// Order persistence.
    pub orders: Arc<dyn OrdersService>,

    /// Payment creation.
    pub payments: Arc<dyn PaymentsService>,

    /// Receipt output.
    pub printer: Arc<dyn ReceiptPrinter>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context over the point-of-sale API.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_api_config(config: &ApiConfig) -> Result<Self, ConfigError> {
        let client = ApiClient::new(config)?;

        Ok(Self {
            catalog: Arc::new(HttpCatalogService::new(client.clone())),
            customers: Arc::new(HttpCustomersService::new(client.clone())),
            settings: Arc::new(HttpSettingsService::new(client.clone())),
            orders: Arc::new(HttpOrdersService::new(client.clone())),
            payments: Arc::new(HttpPaymentsService::new(client)),
            printer: Arc::new(LogReceiptPrinter),
        })
    }

    /// Checkout controller, printing receipts when `auto_print` is set.
    #[must_use]
    pub fn checkout_service(&self, auto_print: bool) -> CheckoutService {
        let service = CheckoutService::new(Arc::clone(&self.orders), Arc::clone(&self.payments));

        if auto_print {
            service.with_printer(Arc::clone(&self.printer))
        } else {
            service
        }
    }
}
