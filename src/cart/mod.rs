//! Cart
//!
//! Line items referencing catalog products by id. Quantities never drop below one: a
//! decrement at one is ignored, and removal is its own operation. Out-of-stock products
//! stay in the cart (and in the subtotal) but their quantities cannot be changed.

use std::num::NonZeroU32;

use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    catalog::{Catalog, CatalogError},
    pricing::PricingMode,
    products::{Product, ProductId},
};

pub mod quantity;

/// Errors related to cart mutations.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The product is not in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The product cannot be purchased, so its quantity is locked.
    #[error("Product {0} is out of stock")]
    OutOfStock(ProductId),

    /// Adding zero of something.
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    /// The line quantity would exceed `u32::MAX`.
    #[error("Quantity for product {0} overflowed")]
    QuantityOverflow(ProductId),
}

/// One product and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    product: ProductId,
    quantity: NonZeroU32,
}

impl LineItem {
    /// Create a line item.
    #[must_use]
    pub fn new(product: ProductId, quantity: NonZeroU32) -> Self {
        Self { product, quantity }
    }

    /// The referenced product
    #[must_use]
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Quantity, always at least one
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }
}

/// A line whose quantity is below the product's wholesale minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    /// Product on the line
    pub product: ProductId,

    /// Minimum order quantity for the product
    pub required: u32,

    /// Quantity in the cart
    pub actual: u32,
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: SmallVec<[LineItem; 8]>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a cart from `(product, quantity)` pairs.
    ///
    /// Unlike [`Cart::add`], this accepts out-of-stock products so a saved cart can be
    /// shown as it was. Repeated products are merged.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a product is unknown or a quantity is zero.
    pub fn from_lines(
        lines: impl IntoIterator<Item = (ProductId, u32)>,
        catalog: &Catalog,
    ) -> Result<Self, CartError> {
        let mut cart = Self::new();

        for (product, quantity) in lines {
            catalog.product(product)?;

            let quantity = NonZeroU32::new(quantity).ok_or(CartError::ZeroQuantity)?;

            cart.merge(product, quantity)?;
        }

        Ok(cart)
    }

    /// Add `quantity` of a product, merging with an existing line. Returns the line quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is unknown or out of stock, the quantity is
    /// zero, or the line quantity would overflow.
    pub fn add(
        &mut self,
        catalog: &Catalog,
        product: ProductId,
        quantity: u32,
    ) -> Result<u32, CartError> {
        let quantity = NonZeroU32::new(quantity).ok_or(CartError::ZeroQuantity)?;

        ensure_in_stock(catalog.product(product)?)?;

        let updated = self.merge(product, quantity)?;

        debug!(%product, quantity = updated, "added to cart");

        Ok(updated)
    }

    /// Increase a line's quantity by one. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is not in the cart, out of stock, or would overflow.
    pub fn increment(&mut self, catalog: &Catalog, product: ProductId) -> Result<u32, CartError> {
        let current = self.locked_quantity(catalog, product)?;
        let next = current
            .checked_add(1)
            .ok_or(CartError::QuantityOverflow(product))?;

        self.set_quantity(catalog, product, next)
    }

    /// Decrease a line's quantity by one. At one this is a no-op. Returns the quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is not in the cart or out of stock.
    pub fn decrement(&mut self, catalog: &Catalog, product: ProductId) -> Result<u32, CartError> {
        let current = self.locked_quantity(catalog, product)?;

        self.set_quantity(catalog, product, current.saturating_sub(1))
    }

    /// Set a line's quantity. Values below one are ignored. Returns the resulting quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is not in the cart or out of stock.
    pub fn set_quantity(
        &mut self,
        catalog: &Catalog,
        product: ProductId,
        quantity: u32,
    ) -> Result<u32, CartError> {
        let current = self.locked_quantity(catalog, product)?;

        let Some(quantity) = NonZeroU32::new(quantity) else {
            debug!(%product, "ignoring quantity below 1");
            return Ok(current);
        };

        if let Some(line) = self.line_mut(product) {
            line.quantity = quantity;
        }

        debug!(%product, quantity = quantity.get(), "updated cart quantity");

        Ok(quantity.get())
    }

    /// Remove a product's line, regardless of stock.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if there is no such line.
    pub fn remove(&mut self, product: ProductId) -> Result<LineItem, CartError> {
        let position = self
            .lines
            .iter()
            .position(|line| line.product == product)
            .ok_or(CartError::NotInCart(product))?;

        debug!(%product, "removed from cart");

        Ok(self.lines.remove(position))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Line for a product, if present.
    #[must_use]
    pub fn get(&self, product: ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.product == product)
    }

    /// Lines in the order they were added.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Lines below their product's minimum order quantity. Always empty in retail mode.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a line refers to a product missing from the catalog.
    pub fn wholesale_shortfalls(
        &self,
        catalog: &Catalog,
        mode: PricingMode,
    ) -> Result<SmallVec<[Shortfall; 4]>, CartError> {
        let mut shortfalls = SmallVec::new();

        if !mode.is_wholesale() {
            return Ok(shortfalls);
        }

        for line in &self.lines {
            let required = catalog.product(line.product)?.minimum_order_quantity();

            if line.quantity() < required {
                shortfalls.push(Shortfall {
                    product: line.product,
                    required,
                    actual: line.quantity(),
                });
            }
        }

        Ok(shortfalls)
    }

    fn merge(&mut self, product: ProductId, quantity: NonZeroU32) -> Result<u32, CartError> {
        if let Some(line) = self.line_mut(product) {
            line.quantity = line
                .quantity
                .checked_add(quantity.get())
                .ok_or(CartError::QuantityOverflow(product))?;

            return Ok(line.quantity());
        }

        self.lines.push(LineItem::new(product, quantity));

        Ok(quantity.get())
    }

    /// Current quantity of a line whose quantity may be changed.
    fn locked_quantity(&self, catalog: &Catalog, product: ProductId) -> Result<u32, CartError> {
        let line = self.get(product).ok_or(CartError::NotInCart(product))?;

        ensure_in_stock(catalog.product(product)?)?;

        Ok(line.quantity())
    }

    fn line_mut(&mut self, product: ProductId) -> Option<&mut LineItem> {
        self.lines.iter_mut().find(|line| line.product == product)
    }
}

fn ensure_in_stock(product: &Product) -> Result<(), CartError> {
    if product.in_stock() {
        Ok(())
    } else {
        warn!(product = %product.id(), "quantity change refused: out of stock");
        Err(CartError::OutOfStock(product.id()))
    }
}
