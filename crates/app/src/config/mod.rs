//! Application configuration

use clap::Args;
use thiserror::Error;
use valet::{prices::PriceError, pricing::PricingError};

pub mod api;
pub mod logging;
pub mod pricing;

pub use api::ApiConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use pricing::PricingSettings;

/// Settings shared by every subcommand.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Point-of-sale API connection settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Pricing overrides and feature toggles.
    #[command(flatten)]
    pub pricing: PricingSettings,
}

/// Errors raised while resolving configuration into runtime settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configured or fetched currency is unsupported.
    #[error(transparent)]
    Currency(#[from] PriceError),

    /// Configured or fetched tax rate is out of range.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
