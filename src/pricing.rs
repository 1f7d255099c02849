//! Pricing
//!
//! Resolves the unit price a view should show and charge for a product.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    money::{Price, to_decimal},
    products::Product,
};

/// Raised when a pricing mode name is not recognised.
#[derive(Debug, Error, PartialEq)]
#[error("Unknown pricing mode: {0} (expected `retail` or `wholesale`)")]
pub struct UnknownPricingMode(String);

/// Which price list a view is showing. Applies to every product in the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PricingMode {
    /// Regular consumer prices
    #[default]
    Retail,

    /// Trade prices, subject to minimum order quantities
    Wholesale,
}

impl PricingMode {
    /// Switch between retail and wholesale.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            PricingMode::Retail => PricingMode::Wholesale,
            PricingMode::Wholesale => PricingMode::Retail,
        }
    }

    /// Whether minimum order quantities apply.
    #[must_use]
    pub fn is_wholesale(self) -> bool {
        matches!(self, PricingMode::Wholesale)
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingMode::Retail => f.write_str("retail"),
            PricingMode::Wholesale => f.write_str("wholesale"),
        }
    }
}

impl FromStr for PricingMode {
    type Err = UnknownPricingMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retail" => Ok(PricingMode::Retail),
            "wholesale" => Ok(PricingMode::Wholesale),
            _ => Err(UnknownPricingMode(s.to_string())),
        }
    }
}

/// Unit price of a product under the given mode.
pub fn unit_price(product: &Product, mode: PricingMode) -> Price {
    match mode {
        PricingMode::Retail => product.retail_price(),
        PricingMode::Wholesale => product.wholesale_price(),
    }
}

/// Unit price multiplied by quantity, at full precision.
pub fn line_total(product: &Product, mode: PricingMode, quantity: u32) -> Decimal {
    to_decimal(&unit_price(product, mode)) * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::products::{Category, ProductId};

    use super::*;

    fn gaming_pro() -> Result<Product, crate::products::ProductError> {
        Product::new(
            ProductId::new(3),
            "Gaming Chair Pro",
            Category::Gaming,
            Money::from_minor(54_999, USD),
            Money::from_minor(37_999, USD),
        )
    }

    #[test]
    fn unit_price_follows_mode() -> TestResult {
        let product = gaming_pro()?;

        assert_eq!(
            unit_price(&product, PricingMode::Retail),
            Money::from_minor(54_999, USD)
        );
        assert_eq!(
            unit_price(&product, PricingMode::Wholesale),
            Money::from_minor(37_999, USD)
        );

        Ok(())
    }

    #[test]
    fn line_total_multiplies_quantity() -> TestResult {
        let product = gaming_pro()?;

        assert_eq!(
            line_total(&product, PricingMode::Retail, 2),
            Decimal::new(109_998, 2)
        );
        assert_eq!(
            line_total(&product, PricingMode::Wholesale, 12),
            Decimal::new(455_988, 2)
        );

        Ok(())
    }

    #[test]
    fn mode_parses_and_toggles() -> TestResult {
        assert_eq!("Wholesale".parse::<PricingMode>()?, PricingMode::Wholesale);
        assert_eq!(PricingMode::Retail.toggled(), PricingMode::Wholesale);
        assert_eq!(PricingMode::default(), PricingMode::Retail);
        assert!("bulk".parse::<PricingMode>().is_err());

        Ok(())
    }
}
