//! Shop settings collaborator.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Deserialize;
use valet::catalog::percent_points;

use super::{ApiClient, ApiError};

/// Subset of the shop's business settings that affects pricing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShopSettings {
    settings: BusinessSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct BusinessSettings {
    #[serde(default)]
    country: CountrySettings,

    #[serde(default)]
    tax: TaxSettings,

    #[serde(default = "default_auto_print")]
    auto_print_receipt: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct CountrySettings {
    currency_code: String,
}

impl Default for CountrySettings {
    fn default() -> Self {
        Self {
            currency_code: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct TaxSettings {
    /// Percent points (`8` is 8%).
    #[serde(default, with = "rust_decimal::serde::float")]
    tax_rate: Decimal,
}

const fn default_auto_print() -> bool {
    true
}

impl ShopSettings {
    /// Tax rate as a fraction.
    pub fn tax_rate(&self) -> Decimal {
        percent_points(self.settings.tax.tax_rate) * Decimal::ONE
    }

    /// ISO currency code.
    pub fn currency_code(&self) -> &str {
        &self.settings.country.currency_code
    }

    /// Whether the shop prints receipts automatically.
    pub fn auto_print_receipt(&self) -> bool {
        self.settings.auto_print_receipt
    }
}

/// HTTP settings collaborator.
#[derive(Debug, Clone)]
pub struct HttpSettingsService {
    client: ApiClient,
}

impl HttpSettingsService {
    /// Create a settings service over the shared client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SettingsService for HttpSettingsService {
    #[tracing::instrument(name = "settings.fetch", skip(self), err)]
    async fn fetch_settings(&self) -> Result<ShopSettings, ApiError> {
        self.client
            .send(self.client.request(Method::GET, "/settings"))
            .await
    }
}

#[automock]
#[async_trait]
/// Source of the shop's business settings.
pub trait SettingsService: Send + Sync {
    /// Fetch the shop's business settings.
    async fn fetch_settings(&self) -> Result<ShopSettings, ApiError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_sections_use_defaults() -> TestResult {
        let settings: ShopSettings =
            serde_json::from_str(r#"{"id": "default", "settings": {"business_name": "Spotless"}}"#)?;

        assert_eq!(settings.tax_rate(), Decimal::ZERO);
        assert_eq!(settings.currency_code(), "USD");
        assert!(settings.auto_print_receipt());

        Ok(())
    }

    #[test]
    fn tax_rate_is_read_as_percent_points() -> TestResult {
        let settings: ShopSettings = serde_json::from_str(
            r#"{"settings": {"country": {"currency_code": "GBP", "currency_symbol": "£"}, "tax": {"tax_name": "VAT", "tax_rate": 20}}}"#,
        )?;

        assert_eq!(settings.tax_rate(), dec!(0.2));
        assert_eq!(settings.currency_code(), "GBP");

        Ok(())
    }
}
