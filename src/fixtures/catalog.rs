//! Catalog Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    money::parse_price,
    products::{Category, Product, ProductId},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFixture {
    /// Catalog id, also the listing order
    pub id: u32,

    /// Product name
    pub name: String,

    /// Category tag (e.g., "executive")
    pub category: String,

    /// Retail price (e.g., "899.99 USD")
    pub price: String,

    /// Wholesale price
    pub wholesale_price: String,

    /// Price before the sale, if on sale
    #[serde(default)]
    pub original_price: Option<String>,

    /// Wholesale minimum order quantity
    #[serde(default = "default_minimum_order_quantity")]
    pub minimum_order_quantity: u32,

    /// Whether the product can be purchased
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,

    /// Shows the "new" badge
    #[serde(default)]
    pub is_new: bool,

    /// Review score (e.g., "4.8")
    #[serde(default)]
    pub rating: Option<String>,

    /// Review count
    #[serde(default)]
    pub reviews: u32,

    /// Marketing description
    #[serde(default)]
    pub description: String,

    /// Feature bullet points
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_minimum_order_quantity() -> u32 {
    1
}

fn default_in_stock() -> bool {
    true
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let id = ProductId::new(fixture.id);
        let category: Category = fixture.category.parse()?;

        let rating = fixture
            .rating
            .as_deref()
            .map(|rating| {
                rating
                    .trim()
                    .parse::<Decimal>()
                    .map_err(|_err| FixtureError::InvalidRating(rating.to_string()))
            })
            .transpose()?
            .unwrap_or(Decimal::ZERO);

        let product = Product::new(
            id,
            fixture.name,
            category,
            parse_price(&fixture.price)?,
            parse_price(&fixture.wholesale_price)?,
        )?
        .with_minimum_order_quantity(fixture.minimum_order_quantity)?
        .with_rating(rating, fixture.reviews)?
        .with_stock(fixture.in_stock)
        .with_new_badge(fixture.is_new)
        .with_description(fixture.description)
        .with_features(fixture.features);

        Ok(match fixture.original_price {
            Some(original) => product.with_original_price(parse_price(&original)?)?,
            None => product,
        })
    }
}
