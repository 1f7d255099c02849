//! Products

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

use crate::money::Price;

/// Stable catalog identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(u32);

impl ProductId {
    /// Wrap a raw catalog id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw catalog id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Chair category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Executive chairs
    Executive,

    /// Ergonomic task and mesh chairs
    Ergonomic,

    /// Gaming chairs
    Gaming,

    /// Conference room chairs
    Conference,
}

impl Category {
    /// Every category, in the order the storefront lists them.
    pub const ALL: [Category; 4] = [
        Category::Executive,
        Category::Ergonomic,
        Category::Gaming,
        Category::Conference,
    ];

    /// The lowercase tag used in fixtures and filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Executive => "executive",
            Category::Ergonomic => "ergonomic",
            Category::Gaming => "gaming",
            Category::Conference => "conference",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProductError::UnknownCategory(s.to_string()))
    }
}

/// Errors raised when a product violates a catalog invariant.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// Category tag not recognised.
    #[error("Unknown product category: {0}")]
    UnknownCategory(String),

    /// A price was below zero.
    #[error("Product {0}: {1} price must not be negative")]
    NegativePrice(ProductId, &'static str),

    /// A price used a different currency from the retail price.
    #[error("Product {id}: {kind} price has currency {actual}, expected {expected}")]
    CurrencyMismatch {
        /// Offending product
        id: ProductId,
        /// Which price was wrong
        kind: &'static str,
        /// Retail price currency
        expected: &'static str,
        /// Currency found
        actual: &'static str,
    },

    /// Wholesale price above retail.
    #[error("Product {0}: wholesale price exceeds retail price")]
    WholesaleAboveRetail(ProductId),

    /// Original ("was") price not above retail, so there is no sale.
    #[error("Product {0}: original price must be greater than retail price")]
    OriginalNotAboveRetail(ProductId),

    /// Minimum order quantity of zero.
    #[error("Product {0}: minimum order quantity must be positive")]
    ZeroMinimumOrder(ProductId),

    /// Rating outside `0..=5`.
    #[error("Product {0}: rating must be between 0 and 5")]
    InvalidRating(ProductId),
}

/// A sellable chair.
///
/// Construction validates the pricing invariants: both prices are non-negative and share a
/// currency, wholesale never exceeds retail, and an original price (when present) is above
/// retail.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    category: Category,
    retail_price: Price,
    wholesale_price: Price,
    original_price: Option<Price>,
    minimum_order_quantity: u32,
    in_stock: bool,
    is_new: bool,
    rating: Decimal,
    reviews: u32,
    description: String,
    features: SmallVec<[String; 4]>,
}

impl Product {
    /// Create an in-stock product with a minimum order quantity of one.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if a price is negative, the currencies differ, or the
    /// wholesale price is above the retail price.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: Category,
        retail_price: Price,
        wholesale_price: Price,
    ) -> Result<Self, ProductError> {
        ensure_non_negative(id, "retail", &retail_price)?;
        ensure_non_negative(id, "wholesale", &wholesale_price)?;
        ensure_same_currency(id, "wholesale", &retail_price, &wholesale_price)?;

        if wholesale_price.to_minor_units() > retail_price.to_minor_units() {
            return Err(ProductError::WholesaleAboveRetail(id));
        }

        Ok(Self {
            id,
            name: name.into(),
            category,
            retail_price,
            wholesale_price,
            original_price: None,
            minimum_order_quantity: 1,
            in_stock: true,
            is_new: false,
            rating: Decimal::ZERO,
            reviews: 0,
            description: String::new(),
            features: SmallVec::new(),
        })
    }

    /// Mark the product as on sale from a higher original price.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if the original price is not strictly above retail or uses
    /// a different currency.
    pub fn with_original_price(mut self, original_price: Price) -> Result<Self, ProductError> {
        ensure_same_currency(self.id, "original", &self.retail_price, &original_price)?;

        if original_price.to_minor_units() <= self.retail_price.to_minor_units() {
            return Err(ProductError::OriginalNotAboveRetail(self.id));
        }

        self.original_price = Some(original_price);

        Ok(self)
    }

    /// Set the wholesale minimum order quantity.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::ZeroMinimumOrder`] for a quantity of zero.
    pub fn with_minimum_order_quantity(mut self, quantity: u32) -> Result<Self, ProductError> {
        if quantity == 0 {
            return Err(ProductError::ZeroMinimumOrder(self.id));
        }

        self.minimum_order_quantity = quantity;

        Ok(self)
    }

    /// Set the review score (0 to 5) and review count.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidRating`] if the rating is outside `0..=5`.
    pub fn with_rating(mut self, rating: Decimal, reviews: u32) -> Result<Self, ProductError> {
        if rating < Decimal::ZERO || rating > Decimal::from(5) {
            return Err(ProductError::InvalidRating(self.id));
        }

        self.rating = rating;
        self.reviews = reviews;

        Ok(self)
    }

    /// Set whether the product can currently be purchased.
    #[must_use]
    pub fn with_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Set the "new" badge.
    #[must_use]
    pub fn with_new_badge(mut self, is_new: bool) -> Self {
        self.is_new = is_new;
        self
    }

    /// Set the marketing description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the feature bullet points.
    #[must_use]
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Catalog id
    #[must_use]
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Retail unit price
    #[must_use]
    pub fn retail_price(&self) -> Price {
        self.retail_price
    }

    /// Wholesale unit price
    #[must_use]
    pub fn wholesale_price(&self) -> Price {
        self.wholesale_price
    }

    /// Original price, when the product is on sale
    #[must_use]
    pub fn original_price(&self) -> Option<Price> {
        self.original_price
    }

    /// Minimum quantity for a wholesale order
    #[must_use]
    pub fn minimum_order_quantity(&self) -> u32 {
        self.minimum_order_quantity
    }

    /// Whether the product can be purchased
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.in_stock
    }

    /// Whether the product carries the "new" badge
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Whether the product carries the "sale" badge
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some()
    }

    /// Review score
    #[must_use]
    pub fn rating(&self) -> Decimal {
        self.rating
    }

    /// Number of reviews
    #[must_use]
    pub fn reviews(&self) -> u32 {
        self.reviews
    }

    /// Marketing description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Feature bullet points
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Amount saved against the original price, if the product is on sale.
    #[must_use]
    pub fn savings(&self) -> Option<Price> {
        self.original_price
            .and_then(|original| original.sub(self.retail_price).ok())
    }
}

fn ensure_non_negative(id: ProductId, kind: &'static str, price: &Price) -> Result<(), ProductError> {
    if price.to_minor_units() < 0 {
        Err(ProductError::NegativePrice(id, kind))
    } else {
        Ok(())
    }
}

fn ensure_same_currency(
    id: ProductId,
    kind: &'static str,
    retail: &Price,
    other: &Price,
) -> Result<(), ProductError> {
    if retail.currency() == other.currency() {
        Ok(())
    } else {
        Err(ProductError::CurrencyMismatch {
            id,
            kind,
            expected: retail.currency().iso_alpha_code,
            actual: other.currency().iso_alpha_code,
        })
    }
}
