//! Catalog
//!
//! The fixed list of purchasable chairs. A catalog is built once at start-up and never
//! mutated; carts and views refer to its products by [`ProductId`].

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    pricing::PricingMode,
    products::{Category, Product, ProductError, ProductId},
};

pub mod filter;
pub mod storefront;

use filter::{CategoryFilter, ProductFilter, filter_products};

/// Errors related to catalog construction or lookups.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share an id.
    #[error("Duplicate product id {0}")]
    DuplicateProduct(ProductId),

    /// A product's currency differs from the catalog currency (product, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// No product with this id.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// A product failed validation.
    #[error(transparent)]
    Product(#[from] ProductError),
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: Vec::new(),
            index: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from products, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if ids repeat or a product uses another currency.
    pub fn with_products(
        products: impl IntoIterator<Item = Product>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        for product in products {
            catalog.push(product)?;
        }

        Ok(catalog)
    }

    fn push(&mut self, product: Product) -> Result<(), CatalogError> {
        let product_currency = product.retail_price().currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.id(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if self.index.contains_key(&product.id()) {
            return Err(CatalogError::DuplicateProduct(product.id()));
        }

        self.index.insert(product.id(), self.products.len());
        self.products.push(product);

        Ok(())
    }

    /// Look up a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|&position| self.products.get(position))
    }

    /// Look up a product that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if the id is unknown.
    pub fn product(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.get(id).ok_or(CatalogError::ProductNotFound(id))
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Products matching the listing filter under `mode`, in catalog order.
    #[must_use]
    pub fn filter(&self, filter: &ProductFilter, mode: PricingMode) -> Vec<&Product> {
        filter_products(&self.products, filter, mode)
    }

    /// Product count for each category selector, starting with `all`.
    #[must_use]
    pub fn category_counts(&self) -> SmallVec<[(CategoryFilter, usize); 5]> {
        let mut counts = SmallVec::new();

        counts.push((CategoryFilter::All, self.products.len()));

        for category in Category::ALL {
            let count = self
                .products
                .iter()
                .filter(|product| product.category() == category)
                .count();

            counts.push((CategoryFilter::Only(category), count));
        }

        counts
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency of every price in the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
