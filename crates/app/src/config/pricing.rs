//! Pricing Config

use clap::{ArgAction, Args};
use rust_decimal::Decimal;
use valet::{
    prices::parse_currency,
    pricing::{Capabilities, PricingConfig},
};

use crate::{api::ShopSettings, config::ConfigError};

/// Pricing overrides and feature toggles.
#[derive(Debug, Clone, Args)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "independent boolean feature toggles from CLI/env."
)]
pub struct PricingSettings {
    /// Tax rate as a fraction (0.08 is 8%); overrides the shop settings
    #[arg(long, env = "VALET_TAX_RATE")]
    pub tax_rate: Option<Decimal>,

    /// ISO currency code (GBP, USD, EUR); overrides the shop settings
    #[arg(long, env = "VALET_CURRENCY")]
    pub currency: Option<String>,

    /// Print a receipt after each checkout
    #[arg(long, env = "VALET_AUTO_PRINT", default_value_t = true, action = ArgAction::Set)]
    pub auto_print: bool,

    /// Ignore per-item volume discount tiers.
    #[arg(long, env = "VALET_DISABLE_VOLUME_DISCOUNTS", default_value_t = false)]
    pub disable_volume_discounts: bool,

    /// Ignore customer discounts.
    #[arg(long, env = "VALET_DISABLE_CUSTOMER_DISCOUNTS", default_value_t = false)]
    pub disable_customer_discounts: bool,

    /// Disable delivery scheduling and fees.
    #[arg(long, env = "VALET_DISABLE_DELIVERY", default_value_t = false)]
    pub disable_delivery: bool,

    /// Disable the invoice payment method.
    #[arg(long, env = "VALET_DISABLE_INVOICE", default_value_t = false)]
    pub disable_invoice: bool,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            tax_rate: None,
            currency: None,
            auto_print: true,
            disable_volume_discounts: false,
            disable_customer_discounts: false,
            disable_delivery: false,
            disable_invoice: false,
        }
    }
}

impl PricingSettings {
    /// Enabled features after applying the disable toggles.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            volume_discounts: !self.disable_volume_discounts,
            customer_discounts: !self.disable_customer_discounts,
            delivery: !self.disable_delivery,
            invoice_payment: !self.disable_invoice,
        }
    }

    /// Resolve the pricing configuration, preferring local overrides over
    /// the shop settings and falling back to zero tax in USD.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unsupported currency or out-of-range tax rate.
    pub fn resolve(&self, shop: Option<&ShopSettings>) -> Result<PricingConfig, ConfigError> {
        let tax_rate = match (self.tax_rate, shop) {
            (Some(rate), _) => rate,
            (None, Some(shop)) => shop.tax_rate(),
            (None, None) => Decimal::ZERO,
        };

        let code = self
            .currency
            .as_deref()
            .or_else(|| shop.map(|shop| shop.currency_code()))
            .unwrap_or("USD");

        Ok(PricingConfig::new(
            tax_rate,
            parse_currency(code)?,
            self.capabilities(),
        )?)
    }

    /// Whether receipts print after checkout.
    pub fn auto_print(&self, shop: Option<&ShopSettings>) -> bool {
        self.auto_print && shop.is_none_or(ShopSettings::auto_print_receipt)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use rusty_money::iso::{EUR, USD};
    use testresult::TestResult;

    use super::*;

    fn shop() -> TestResult<ShopSettings> {
        Ok(serde_json::from_value(serde_json::json!({
            "settings": {
                "country": {"currency_code": "EUR"},
                "tax": {"tax_rate": 20.0},
                "auto_print_receipt": false
            }
        }))?)
    }

    #[test]
    fn defaults_to_untaxed_usd() -> TestResult {
        let config = PricingSettings::default().resolve(None)?;

        assert_eq!(config.tax_rate(), Decimal::ZERO);
        assert_eq!(config.currency(), USD);
        assert_eq!(config.capabilities(), Capabilities::default());

        Ok(())
    }

    #[test]
    fn shop_settings_fill_in_missing_overrides() -> TestResult {
        let shop = shop()?;
        let config = PricingSettings::default().resolve(Some(&shop))?;

        assert_eq!(config.tax_rate(), dec!(0.2));
        assert_eq!(config.currency(), EUR);
        assert!(!PricingSettings::default().auto_print(Some(&shop)));

        Ok(())
    }

    #[test]
    fn local_overrides_win() -> TestResult {
        let shop = shop()?;
        let settings = PricingSettings {
            tax_rate: Some(dec!(0.08)),
            currency: Some("usd".to_string()),
            disable_invoice: true,
            ..PricingSettings::default()
        };

        let config = settings.resolve(Some(&shop))?;

        assert_eq!(config.tax_rate(), dec!(0.08));
        assert_eq!(config.currency(), USD);
        assert!(!config.capabilities().invoice_payment);

        Ok(())
    }

    #[test]
    fn out_of_range_tax_rate_is_rejected() {
        let settings = PricingSettings {
            tax_rate: Some(dec!(8)),
            ..PricingSettings::default()
        };

        assert!(matches!(settings.resolve(None), Err(ConfigError::Pricing(_))));
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let settings = PricingSettings {
            currency: Some("JPY".to_string()),
            ..PricingSettings::default()
        };

        assert!(matches!(settings.resolve(None), Err(ConfigError::Currency(_))));
    }
}
