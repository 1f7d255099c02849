//! Pricing configuration
//!
//! Tax, shipping and promotion settings used by the order summary. The defaults are the
//! shop's published terms: 8% tax, free shipping over $500.00, otherwise $49.99, and the
//! `SAVE10` / `WELCOME20` codes.

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, USD},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    money::{MoneyParseError, Price, parse_price, parse_rate, rate_fraction},
    promotions::{PromotionCode, PromotionError, PromotionTable},
};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price or rate
    #[error(transparent)]
    Money(#[from] MoneyParseError),

    /// Invalid promotion entry
    #[error(transparent)]
    Promotion(#[from] PromotionError),

    /// Threshold and shipping fee use different currencies
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Negative shipping amounts or a tax rate outside 0% to 100%
    #[error("Invalid setting {0}: {1}")]
    OutOfRange(&'static str, String),
}

/// Tax, shipping and promotion settings.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    tax_rate: Percentage,
    free_shipping_threshold: Price,
    flat_shipping: Price,
    promotions: PromotionTable,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Percentage::from(Decimal::new(8, 2)),
            free_shipping_threshold: Money::from_minor(50_000, USD),
            flat_shipping: Money::from_minor(4_999, USD),
            promotions: PromotionTable::standard(),
        }
    }
}

/// Config file layout
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfigFile {
    /// Tax rate, e.g. `"8%"` or `"0.08"`
    pub tax_rate: String,

    /// Orders with a subtotal strictly above this ship free, e.g. `"500.00 USD"`
    pub free_shipping_threshold: String,

    /// Shipping fee otherwise, e.g. `"49.99 USD"`
    pub flat_shipping: String,

    /// Promotion code -> rate. Omit to keep the standard codes.
    #[serde(default)]
    pub promotions: Option<FxHashMap<String, String>>,
}

impl TryFrom<PricingConfigFile> for PricingConfig {
    type Error = ConfigError;

    fn try_from(file: PricingConfigFile) -> Result<Self, Self::Error> {
        let tax_rate = parse_rate(&file.tax_rate)?;
        let tax_fraction = rate_fraction(tax_rate);

        if tax_fraction < Decimal::ZERO || tax_fraction > Decimal::ONE {
            return Err(ConfigError::OutOfRange("tax_rate", file.tax_rate));
        }

        let free_shipping_threshold = parse_price(&file.free_shipping_threshold)?;
        let flat_shipping = parse_price(&file.flat_shipping)?;

        if free_shipping_threshold.currency() != flat_shipping.currency() {
            return Err(ConfigError::CurrencyMismatch(
                free_shipping_threshold.currency().iso_alpha_code,
                flat_shipping.currency().iso_alpha_code,
            ));
        }

        if free_shipping_threshold.to_minor_units() < 0 {
            return Err(ConfigError::OutOfRange(
                "free_shipping_threshold",
                file.free_shipping_threshold,
            ));
        }

        if flat_shipping.to_minor_units() < 0 {
            return Err(ConfigError::OutOfRange("flat_shipping", file.flat_shipping));
        }

        let promotions = match file.promotions {
            None => PromotionTable::standard(),
            Some(entries) => {
                let mut table = PromotionTable::default();

                for (code, rate) in entries {
                    table.insert(PromotionCode::new(&code, parse_rate(&rate)?)?)?;
                }

                table
            }
        };

        Ok(Self {
            tax_rate,
            free_shipping_threshold,
            flat_shipping,
            promotions,
        })
    }
}

impl PricingConfig {
    /// Parse a config from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the YAML is malformed or a value is invalid.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: PricingConfigFile = serde_norway::from_str(contents)?;

        file.try_into()
    }

    /// Load a config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Tax rate applied after discounts
    #[must_use]
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// Subtotal above which shipping is free
    #[must_use]
    pub fn free_shipping_threshold(&self) -> Price {
        self.free_shipping_threshold
    }

    /// Shipping fee at or below the threshold
    #[must_use]
    pub fn flat_shipping(&self) -> Price {
        self.flat_shipping
    }

    /// Accepted promotion codes
    #[must_use]
    pub fn promotions(&self) -> &PromotionTable {
        &self.promotions
    }

    /// Currency of the shipping settings
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.flat_shipping.currency()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_match_published_terms() {
        let config = PricingConfig::default();

        assert_eq!(rate_fraction(config.tax_rate()), Decimal::new(8, 2));
        assert_eq!(config.free_shipping_threshold(), Money::from_minor(50_000, USD));
        assert_eq!(config.flat_shipping(), Money::from_minor(4_999, USD));
        assert_eq!(config.promotions().len(), 2);
        assert_eq!(config.currency(), USD);
    }

    #[test]
    fn parses_yaml_and_keeps_standard_codes_when_omitted() -> TestResult {
        let config = PricingConfig::from_yaml_str(
            r#"
tax_rate: "20%"
free_shipping_threshold: "400.00 EUR"
flat_shipping: "15.00 EUR"
"#,
        )?;

        assert_eq!(rate_fraction(config.tax_rate()), Decimal::new(2, 1));
        assert_eq!(config.currency(), EUR);
        assert!(config.promotions().lookup("welcome20").is_ok());

        Ok(())
    }

    #[test]
    fn promotions_replace_the_standard_table() -> TestResult {
        let config = PricingConfig::from_yaml_str(
            r#"
tax_rate: "0.08"
free_shipping_threshold: "500.00 USD"
flat_shipping: "49.99 USD"
promotions:
  spring15: "15%"
"#,
        )?;

        assert_eq!(config.promotions().len(), 1);
        assert_eq!(config.promotions().lookup("SPRING15")?.code(), "SPRING15");
        assert!(config.promotions().lookup("SAVE10").is_err());

        Ok(())
    }

    #[test]
    fn rejects_mixed_currencies() {
        let result = PricingConfig::from_yaml_str(
            r#"
tax_rate: "8%"
free_shipping_threshold: "500.00 USD"
flat_shipping: "49.99 EUR"
"#,
        );

        assert!(matches!(
            result,
            Err(ConfigError::CurrencyMismatch("USD", "EUR"))
        ));
    }

    #[test]
    fn rejects_tax_above_one_hundred_percent() {
        let result = PricingConfig::from_yaml_str(
            r#"
tax_rate: "120%"
free_shipping_threshold: "500.00 USD"
flat_shipping: "49.99 USD"
"#,
        );

        assert!(matches!(result, Err(ConfigError::OutOfRange("tax_rate", _))));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = PricingConfig::from_yaml_str(
            r#"
tax_rate: "8%"
free_shipping_threshold: "500.00 USD"
flat_shipping: "49.99 USD"
handling_fee: "5.00 USD"
"#,
        );

        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn load_reads_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        writeln!(
            file,
            "tax_rate: \"8%\"\nfree_shipping_threshold: \"500.00 USD\"\nflat_shipping: \"49.99 USD\""
        )?;

        let config = PricingConfig::load(file.path())?;

        assert_eq!(config.flat_shipping(), Money::from_minor(4_999, USD));

        Ok(())
    }
}
