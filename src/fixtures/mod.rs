//! Fixtures
//!
//! YAML catalogs, carts and pricing configs under a base directory:
//! `catalog/<name>.yml`, `carts/<name>.yml` and `config/<name>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    config::{ConfigError, PricingConfig},
    fixtures::{carts::CartFixture, catalog::CatalogFixture},
    money::MoneyParseError,
    products::{Product, ProductError, ProductId},
};

pub mod carts;
pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price or rate
    #[error(transparent)]
    Money(#[from] MoneyParseError),

    /// Invalid rating format
    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    /// Product fixture violates a product invariant
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Products could not form a catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart lines could not form a cart
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Invalid pricing config
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products in catalog order
    products: Vec<Product>,

    /// String key -> product id mappings for lookups
    product_keys: FxHashMap<String, ProductId>,

    /// Cart lines as `(product, quantity)`
    cart_lines: Vec<(ProductId, u32)>,

    /// Pricing config, if one was loaded
    config: Option<PricingConfig>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            product_keys: FxHashMap::default(),
            cart_lines: Vec::new(),
            config: None,
            currency: None,
        }
    }

    /// Load products from a YAML catalog fixture. Products are kept in id order, and a file
    /// with any invalid product leaves the fixture unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a product is invalid, or the
    /// currencies differ.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        let mut currency = self.currency;
        let mut loaded = Vec::with_capacity(fixture.products.len());

        for (key, product_fixture) in fixture.products {
            let product: Product = product_fixture.try_into()?;
            let product_currency = product.retail_price().currency();

            match currency {
                Some(existing) if existing != product_currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        product_currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => currency = Some(product_currency),
            }

            loaded.push((key, product));
        }

        // Nothing is recorded unless the whole file is valid
        self.currency = currency;

        for (key, product) in loaded {
            self.product_keys.insert(key, product.id());
            self.products.push(product);
        }

        self.products.sort_by_key(Product::id);

        Ok(self)
    }

    /// Load cart lines from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if referenced products don't exist.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        for line in fixture.lines {
            let product = self.product_id(&line.product)?;

            self.cart_lines.push((product, line.quantity));
        }

        Ok(self)
    }

    /// Load a pricing config from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the config is invalid.
    pub fn load_config(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("config").join(format!("{name}.yml"));

        self.config = Some(PricingConfig::load(file_path)?);

        Ok(self)
    }

    /// Load a catalog and cart with the same name from `./fixtures`
    ///
    /// # Errors
    ///
    /// Returns an error if either fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?.load_cart(name)?;

        Ok(fixture)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        let id = self.product_id(key)?;

        self.products
            .iter()
            .find(|product| product.id() == id)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a product id by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_id(&self, key: &str) -> Result<ProductId, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get all products in catalog order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Get the cart lines
    pub fn cart_lines(&self) -> &[(ProductId, u32)] {
        &self.cart_lines
    }

    /// Create a catalog from the loaded products
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded or ids repeat.
    pub fn catalog(&self) -> Result<Catalog, FixtureError> {
        let currency = self.currency()?;

        Ok(Catalog::with_products(self.products.iter().cloned(), currency)?)
    }

    /// Create a cart from the loaded lines
    ///
    /// # Errors
    ///
    /// Returns an error if a line does not fit the catalog.
    pub fn cart(&self, catalog: &Catalog) -> Result<Cart, FixtureError> {
        Ok(Cart::from_lines(self.cart_lines.iter().copied(), catalog)?)
    }

    /// The loaded pricing config, or the default one
    pub fn config(&self) -> PricingConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Get the currency of the loaded products
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
