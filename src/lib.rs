//! Perch
//!
//! Perch is the pricing engine behind an office-chair storefront: the product catalog,
//! retail and wholesale price resolution, listing filters, the cart, promotion codes, order
//! summaries and chair customization.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod customization;
pub mod fixtures;
pub mod inquiries;
pub mod intro;
pub mod money;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod storefront;
pub mod summary;
