//! Listing filters
//!
//! Category and inclusive price-range predicates for the product listing. The price tested
//! is the one for the active [`PricingMode`].

use std::{fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    money::Price,
    pricing::{PricingMode, unit_price},
    products::{Category, Product, ProductError},
};

/// Upper bound of the default listing price range, in major units.
pub const DEFAULT_MAX_PRICE: i64 = 2_000;

/// Errors building a listing filter.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    /// `min` is above `max`.
    #[error("Price range minimum {min} is above maximum {max}")]
    InvertedRange {
        /// Lower bound
        min: String,
        /// Upper bound
        max: String,
    },

    /// Bounds use different currencies.
    #[error("Price range bounds use {0} and {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Category tag not recognised.
    #[error(transparent)]
    Category(#[from] ProductError),
}

/// Category selector: every product, or a single category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// No category restriction
    #[default]
    All,

    /// Only the given category
    Only(Category),
}

impl CategoryFilter {
    /// Whether a product in `category` passes the filter.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }

        Ok(CategoryFilter::Only(s.parse()?))
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

/// Inclusive `[min, max]` price range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: Price,
    max: Price,
}

impl PriceRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] if the bounds use different currencies or `min > max`.
    pub fn new(min: Price, max: Price) -> Result<Self, FilterError> {
        if min.currency() != max.currency() {
            return Err(FilterError::CurrencyMismatch(
                min.currency().iso_alpha_code,
                max.currency().iso_alpha_code,
            ));
        }

        if min.to_minor_units() > max.to_minor_units() {
            return Err(FilterError::InvertedRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }

        Ok(Self { min, max })
    }

    /// The listing's initial range, `0` to `2000` in the given currency.
    #[must_use]
    pub fn default_for(currency: &'static Currency) -> Self {
        let scale = 10_i64.pow(currency.exponent);

        Self {
            min: Money::from_minor(0, currency),
            max: Money::from_minor(DEFAULT_MAX_PRICE * scale, currency),
        }
    }

    /// Lower bound
    #[must_use]
    pub fn min(&self) -> Price {
        self.min
    }

    /// Upper bound
    #[must_use]
    pub fn max(&self) -> Price {
        self.max
    }

    /// Whether `price` lies within the range. Prices in another currency never match.
    #[must_use]
    pub fn contains(&self, price: &Price) -> bool {
        price.currency() == self.min.currency()
            && (self.min.to_minor_units()..=self.max.to_minor_units())
                .contains(&price.to_minor_units())
    }
}

/// Combined category and price predicate for the listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductFilter {
    /// Category selector
    pub category: CategoryFilter,

    /// Price bounds
    pub price_range: PriceRange,
}

impl ProductFilter {
    /// Create a filter.
    #[must_use]
    pub fn new(category: CategoryFilter, price_range: PriceRange) -> Self {
        Self {
            category,
            price_range,
        }
    }

    /// The listing's initial filter: all categories, default price range.
    #[must_use]
    pub fn default_for(currency: &'static Currency) -> Self {
        Self::new(CategoryFilter::All, PriceRange::default_for(currency))
    }

    /// Whether the product passes both predicates under `mode`.
    #[must_use]
    pub fn matches(&self, product: &Product, mode: PricingMode) -> bool {
        self.category.matches(product.category())
            && self.price_range.contains(&unit_price(product, mode))
    }
}

/// Keep the products matching `filter`, preserving their order.
pub fn filter_products<'c>(
    products: impl IntoIterator<Item = &'c Product>,
    filter: &ProductFilter,
    mode: PricingMode,
) -> Vec<&'c Product> {
    products
        .into_iter()
        .filter(|product| filter.matches(product, mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};
    use testresult::TestResult;

    use crate::products::ProductId;

    use super::*;

    fn chair(id: u32, category: Category, retail: i64, wholesale: i64) -> Result<Product, ProductError> {
        Product::new(
            ProductId::new(id),
            format!("Chair {id}"),
            category,
            Money::from_minor(retail, USD),
            Money::from_minor(wholesale, USD),
        )
    }

    fn range(min: i64, max: i64) -> Result<PriceRange, FilterError> {
        PriceRange::new(Money::from_minor(min, USD), Money::from_minor(max, USD))
    }

    #[test]
    fn range_is_inclusive_at_both_ends() -> TestResult {
        let range = range(100, 200)?;

        assert!(range.contains(&Money::from_minor(100, USD)));
        assert!(range.contains(&Money::from_minor(200, USD)));
        assert!(!range.contains(&Money::from_minor(99, USD)));
        assert!(!range.contains(&Money::from_minor(201, USD)));
        assert!(!range.contains(&Money::from_minor(150, EUR)));

        Ok(())
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            range(500, 100),
            Err(FilterError::InvertedRange { .. })
        ));
    }

    #[test]
    fn default_range_spans_zero_to_two_thousand() {
        let range = PriceRange::default_for(USD);

        assert_eq!(range.min(), Money::from_minor(0, USD));
        assert_eq!(range.max(), Money::from_minor(200_000, USD));
    }

    #[test]
    fn category_filter_parses_all_and_tags() -> TestResult {
        assert_eq!("all".parse::<CategoryFilter>()?, CategoryFilter::All);
        assert_eq!(
            "Ergonomic".parse::<CategoryFilter>()?,
            CategoryFilter::Only(Category::Ergonomic)
        );
        assert!("recliner".parse::<CategoryFilter>().is_err());

        Ok(())
    }

    #[test]
    fn filter_uses_price_for_mode_and_keeps_order() -> TestResult {
        let products = [
            chair(1, Category::Executive, 89_999, 64_999)?,
            chair(2, Category::Ergonomic, 64_999, 44_999)?,
            chair(4, Category::Ergonomic, 44_999, 29_999)?,
            chair(7, Category::Ergonomic, 79_999, 54_999)?,
        ];

        let filter = ProductFilter::new(Category::Ergonomic.into(), range(0, 50_000)?);

        let retail: Vec<u32> = filter_products(&products, &filter, PricingMode::Retail)
            .iter()
            .map(|product| product.id().get())
            .collect();

        let wholesale: Vec<u32> = filter_products(&products, &filter, PricingMode::Wholesale)
            .iter()
            .map(|product| product.id().get())
            .collect();

        assert_eq!(retail, vec![4]);
        assert_eq!(wholesale, vec![2, 4]);

        Ok(())
    }

    #[test]
    fn every_filtered_product_satisfies_both_predicates() -> TestResult {
        let products = [
            chair(1, Category::Executive, 89_999, 64_999)?,
            chair(3, Category::Gaming, 54_999, 37_999)?,
            chair(6, Category::Gaming, 124_999, 89_999)?,
            chair(8, Category::Executive, 159_999, 114_999)?,
        ];

        for mode in [PricingMode::Retail, PricingMode::Wholesale] {
            for category in [CategoryFilter::All, Category::Gaming.into()] {
                let filter = ProductFilter::new(category, range(40_000, 100_000)?);

                for product in filter_products(&products, &filter, mode) {
                    assert!(category.matches(product.category()), "category must match");
                    assert!(
                        filter.price_range.contains(&unit_price(product, mode)),
                        "price must be in range"
                    );
                }
            }
        }

        Ok(())
    }
}
