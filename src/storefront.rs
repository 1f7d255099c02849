//! Storefront
//!
//! The controller that owns every piece of mutable shop state: the cart, the pricing mode,
//! the active promotion and the theme flag. Views read derived values (listings, the order
//! summary, receipts) from it and change state only through its operations.

use std::io;

use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartError, Shortfall, quantity::QuantitySelector},
    catalog::{Catalog, CatalogError, filter::ProductFilter},
    config::PricingConfig,
    customization::{Configuration, CustomizationError, DetailPrice, detail_price},
    pricing::PricingMode,
    products::{Product, ProductId},
    promotions::{PromotionCode, PromotionError},
    receipt::{Receipt, ReceiptError, write_product_table},
    summary::{OrderSummary, SummaryError, calculate},
};

/// Errors returned by storefront operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Catalog lookup failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart mutation refused
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Promotion input rejected
    #[error(transparent)]
    Promotion(#[from] PromotionError),

    /// Summary could not be calculated
    #[error(transparent)]
    Summary(#[from] SummaryError),

    /// Product customization failed
    #[error(transparent)]
    Customization(#[from] CustomizationError),

    /// Receipt could not be written
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// Light or dark presentation. Only the flag is tracked here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light theme
    #[default]
    Light,

    /// Dark theme
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Shop state and the operations that change it.
#[derive(Debug, Clone)]
pub struct Storefront {
    catalog: Catalog,
    cart: Cart,
    mode: PricingMode,
    promotion: Option<PromotionCode>,
    theme: Theme,
    config: PricingConfig,
}

impl Storefront {
    /// Start with an empty cart, retail pricing, no promotion and the light theme.
    #[must_use]
    pub fn new(catalog: Catalog, config: PricingConfig) -> Self {
        Self {
            catalog,
            cart: Cart::new(),
            mode: PricingMode::default(),
            promotion: None,
            theme: Theme::default(),
            config,
        }
    }

    /// Replace the cart, e.g. with one restored from a fixture.
    #[must_use]
    pub fn with_cart(mut self, cart: Cart) -> Self {
        self.cart = cart;
        self
    }

    /// Catalog
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Cart
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Active pricing mode
    #[must_use]
    pub fn mode(&self) -> PricingMode {
        self.mode
    }

    /// Active promotion
    #[must_use]
    pub fn promotion(&self) -> Option<&PromotionCode> {
        self.promotion.as_ref()
    }

    /// Theme flag
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Pricing config
    #[must_use]
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Products matching `filter` under the active mode, in catalog order.
    #[must_use]
    pub fn listing(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.catalog.filter(filter, self.mode)
    }

    /// Add `quantity` of a product. Returns the line quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the product is unknown or out of stock.
    pub fn add_to_cart(&mut self, product: ProductId, quantity: u32) -> Result<u32, StorefrontError> {
        Ok(self.cart.add(&self.catalog, product, quantity)?)
    }

    /// Add the quantity chosen on a product page.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the product is unknown or out of stock.
    pub fn add_selection(
        &mut self,
        product: ProductId,
        selector: QuantitySelector,
    ) -> Result<u32, StorefrontError> {
        self.add_to_cart(product, selector.value())
    }

    /// Increase a line by one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the line is missing or out of stock.
    pub fn increment(&mut self, product: ProductId) -> Result<u32, StorefrontError> {
        Ok(self.cart.increment(&self.catalog, product)?)
    }

    /// Decrease a line by one; a no-op at one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the line is missing or out of stock.
    pub fn decrement(&mut self, product: ProductId) -> Result<u32, StorefrontError> {
        Ok(self.cart.decrement(&self.catalog, product)?)
    }

    /// Set a line's quantity; values below one are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the line is missing or out of stock.
    pub fn set_quantity(&mut self, product: ProductId, quantity: u32) -> Result<u32, StorefrontError> {
        Ok(self.cart.set_quantity(&self.catalog, product, quantity)?)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the product is not in the cart.
    pub fn remove_from_cart(&mut self, product: ProductId) -> Result<(), StorefrontError> {
        self.cart.remove(product)?;

        Ok(())
    }

    /// Switch the pricing mode for every view.
    pub fn set_mode(&mut self, mode: PricingMode) {
        debug!(%mode, "pricing mode changed");

        self.mode = mode;
    }

    /// Flip the theme flag. Returns the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Apply shopper input as the promotion, replacing any active one.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidCode`] if nothing matches. State is unchanged.
    pub fn apply_promotion(&mut self, input: &str) -> Result<&PromotionCode, StorefrontError> {
        let promotion = match self.config.promotions().lookup(input) {
            Ok(promotion) => promotion.clone(),
            Err(err) => {
                warn!(input, "rejected promotion code");
                return Err(err.into());
            }
        };

        info!(code = promotion.code(), "promotion applied");

        Ok(&*self.promotion.insert(promotion))
    }

    /// Drop the active promotion, returning it.
    pub fn clear_promotion(&mut self) -> Option<PromotionCode> {
        self.promotion.take()
    }

    /// Order summary for the current cart, mode and promotion.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the catalog and config currencies differ.
    pub fn summary(&self) -> Result<OrderSummary, StorefrontError> {
        Ok(calculate(
            self.cart.lines(),
            &self.catalog,
            self.mode,
            self.promotion.as_ref(),
            &self.config,
        )?)
    }

    /// Lines below their wholesale minimum. Empty in retail mode.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if a line refers to an unknown product.
    pub fn wholesale_shortfalls(&self) -> Result<SmallVec<[Shortfall; 4]>, StorefrontError> {
        Ok(self.cart.wholesale_shortfalls(&self.catalog, self.mode)?)
    }

    /// Price of a product page with the chosen material.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the product is unknown or the price is negative.
    pub fn detail_price(
        &self,
        product: ProductId,
        configuration: &Configuration<'_>,
    ) -> Result<DetailPrice, StorefrontError> {
        Ok(detail_price(self.catalog.product(product)?, configuration)?)
    }

    /// Receipt for the current cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the summary cannot be calculated.
    pub fn receipt(&self) -> Result<Receipt, StorefrontError> {
        let summary = self.summary()?;

        Ok(Receipt::new(self.cart.lines(), &self.catalog, self.mode, &summary)?)
    }

    /// Write the listing for `filter` as a table.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if writing fails.
    pub fn write_listing(&self, out: impl io::Write, filter: &ProductFilter) -> Result<(), StorefrontError> {
        Ok(write_product_table(out, self.listing(filter), self.mode)?)
    }
}
