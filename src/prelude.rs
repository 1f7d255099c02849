//! Perch prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, LineItem, Shortfall, quantity::QuantitySelector},
    catalog::{
        Catalog, CatalogError,
        filter::{CategoryFilter, FilterError, PriceRange, ProductFilter},
    },
    config::{ConfigError, PricingConfig},
    customization::{Configuration, CustomizationError, DetailPrice, OptionSet},
    fixtures::{Fixture, FixtureError},
    inquiries::{ContactForm, InquiryError, WholesaleApplication},
    intro::{FileStore, KeyValueStore, MemoryStore, WelcomeIntro},
    money::Price,
    pricing::{PricingMode, unit_price},
    products::{Category, Product, ProductError, ProductId},
    promotions::{PromotionCode, PromotionError, PromotionTable},
    receipt::{Receipt, ReceiptError},
    storefront::{Storefront, StorefrontError, Theme},
    summary::{OrderSummary, RoundedSummary, SummaryError},
};
