//! Order summary
//!
//! Subtotal, discount, shipping, tax and total for a set of cart lines. Everything is
//! computed at full decimal precision; [`OrderSummary::rounded`] converts to the
//! currency's minor unit for display.

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::LineItem,
    catalog::{Catalog, CatalogError},
    config::PricingConfig,
    money::{MoneyParseError, Price, from_decimal, rate_fraction, to_decimal},
    pricing::{PricingMode, line_total},
    promotions::PromotionCode,
};

/// Errors that can occur while calculating an order summary.
#[derive(Debug, Error, PartialEq)]
pub enum SummaryError {
    /// A line refers to a product missing from the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The catalog and pricing config disagree on currency.
    #[error("Catalog is priced in {catalog} but shipping is configured in {config}")]
    CurrencyMismatch {
        /// Catalog currency
        catalog: &'static str,

        /// Config currency
        config: &'static str,
    },

    /// An amount could not be rounded to minor units.
    #[error(transparent)]
    Money(#[from] MoneyParseError),
}

/// Full-precision order summary.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    subtotal: Decimal,
    discount: Decimal,
    shipping: Decimal,
    tax: Decimal,
    total: Decimal,
    currency: &'static Currency,
    promotion: Option<String>,
}

/// Order summary rounded to the currency's minor unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedSummary {
    /// Sum of line totals
    pub subtotal: Price,

    /// Promotion discount
    pub discount: Price,

    /// Shipping fee
    pub shipping: Price,

    /// Tax on the discounted subtotal
    pub tax: Price,

    /// Amount due
    pub total: Price,
}

/// Calculate the summary for `lines`.
///
/// Every line counts towards the subtotal, including out-of-stock products. Shipping is
/// decided on the subtotal before the discount, and tax is charged on the subtotal after it.
///
/// # Errors
///
/// Returns a [`SummaryError`] if a line refers to an unknown product or the catalog and
/// config currencies differ.
pub fn calculate(
    lines: &[LineItem],
    catalog: &Catalog,
    mode: PricingMode,
    promotion: Option<&PromotionCode>,
    config: &PricingConfig,
) -> Result<OrderSummary, SummaryError> {
    let currency = catalog.currency();

    if currency != config.currency() {
        return Err(SummaryError::CurrencyMismatch {
            catalog: currency.iso_alpha_code,
            config: config.currency().iso_alpha_code,
        });
    }

    let mut subtotal = Decimal::ZERO;

    for line in lines {
        let product = catalog.product(line.product())?;

        subtotal += line_total(product, mode, line.quantity());
    }

    let discount = promotion.map_or(Decimal::ZERO, |promotion| promotion.discount_on(subtotal));

    let shipping = if subtotal > to_decimal(&config.free_shipping_threshold()) {
        Decimal::ZERO
    } else {
        to_decimal(&config.flat_shipping())
    };

    let tax = (subtotal - discount) * rate_fraction(config.tax_rate());
    let total = subtotal - discount + shipping + tax;

    Ok(OrderSummary {
        subtotal,
        discount,
        shipping,
        tax,
        total,
        currency,
        promotion: promotion.map(|promotion| promotion.code().to_string()),
    })
}

impl OrderSummary {
    /// Sum of unit price times quantity over every line
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Amount taken off by the active promotion
    #[must_use]
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Shipping fee, zero above the free-shipping threshold
    #[must_use]
    pub fn shipping(&self) -> Decimal {
        self.shipping
    }

    /// Tax on the discounted subtotal
    #[must_use]
    pub fn tax(&self) -> Decimal {
        self.tax
    }

    /// Amount due
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Currency of every amount
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Code of the promotion that was applied, if any
    #[must_use]
    pub fn promotion(&self) -> Option<&str> {
        self.promotion.as_deref()
    }

    /// Whether shipping was waived.
    #[must_use]
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Round every amount to the currency's minor unit, midpoints away from zero.
    ///
    /// Each amount is rounded on its own, so the rounded parts need not add up to the
    /// rounded total.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] if an amount does not fit in minor units.
    pub fn rounded(&self) -> Result<RoundedSummary, SummaryError> {
        Ok(RoundedSummary {
            subtotal: from_decimal(self.subtotal, self.currency)?,
            discount: from_decimal(self.discount, self.currency)?,
            shipping: from_decimal(self.shipping, self.currency)?,
            tax: from_decimal(self.tax, self.currency)?,
            total: from_decimal(self.total, self.currency)?,
        })
    }
}
