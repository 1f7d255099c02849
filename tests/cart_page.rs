//! Integration tests for the cart page fixture set.
//!
//! Cart: 1 × Executive Office Chair ($899.99), 2 × Ergonomic Task Chair ($649.99) and
//! 1 × Gaming Chair Pro ($549.99, out of stock).
//!
//! Retail subtotal: $899.99 + $1,299.98 + $549.99 = $2,749.96, above the $500 threshold
//! so shipping is free.

use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use perch::{
    customization::OptionSet,
    fixtures::Fixture,
    pricing::PricingMode,
    prelude::{Price, RoundedSummary},
    storefront::{Storefront, StorefrontError},
};

fn usd(minor: i64) -> Price {
    Money::from_minor(minor, USD)
}

fn cart_page() -> Result<Storefront, Box<dyn std::error::Error>> {
    let fixture = Fixture::from_set("cart_page")?;
    let catalog = fixture.catalog()?;
    let cart = fixture.cart(&catalog)?;

    Ok(Storefront::new(catalog, fixture.config()).with_cart(cart))
}

fn rounded(shop: &Storefront) -> Result<RoundedSummary, Box<dyn std::error::Error>> {
    Ok(shop.summary()?.rounded()?)
}

#[test]
fn retail_summary_without_promotion() -> TestResult {
    let shop = cart_page()?;
    let summary = rounded(&shop)?;

    assert_eq!(summary.subtotal, usd(274_996));
    assert_eq!(summary.discount, usd(0));
    assert_eq!(summary.shipping, usd(0));

    // 8% of $2,749.96 is $219.9968
    assert_eq!(summary.tax, usd(22_000));
    assert_eq!(summary.total, usd(296_996));

    Ok(())
}

#[test]
fn save10_discounts_before_tax() -> TestResult {
    let mut shop = cart_page()?;

    shop.apply_promotion("save10")?;

    let summary = shop.summary()?;

    assert_eq!(summary.promotion(), Some("SAVE10"));

    let summary = summary.rounded()?;

    // 10% of $2,749.96 is $274.996; tax on $2,474.964 is $197.99712
    assert_eq!(summary.discount, usd(27_500));
    assert_eq!(summary.tax, usd(19_800));
    assert_eq!(summary.total, usd(267_296));

    Ok(())
}

#[test]
fn unknown_code_leaves_totals_alone() -> TestResult {
    let mut shop = cart_page()?;
    let before = rounded(&shop)?;

    assert!(matches!(
        shop.apply_promotion("FREECHAIR"),
        Err(StorefrontError::Promotion(_))
    ));
    assert!(shop.promotion().is_none());
    assert_eq!(rounded(&shop)?, before);

    Ok(())
}

#[test]
fn wholesale_mode_reprices_every_line() -> TestResult {
    let mut shop = cart_page()?;

    shop.set_mode(PricingMode::Wholesale);

    let summary = rounded(&shop)?;

    // $649.99 + 2 × $449.99 + $379.99
    assert_eq!(summary.subtotal, usd(192_996));
    assert_eq!(summary.shipping, usd(0));
    assert_eq!(summary.tax, usd(15_440));
    assert_eq!(summary.total, usd(208_436));

    let shortfalls = shop.wholesale_shortfalls()?;

    assert_eq!(shortfalls.len(), 3);
    assert!(shortfalls.iter().all(|shortfall| shortfall.actual < shortfall.required));

    shop.set_mode(PricingMode::Retail);

    assert!(shop.wholesale_shortfalls()?.is_empty());
    assert_eq!(rounded(&shop)?.subtotal, usd(274_996));

    Ok(())
}

#[test]
fn removing_lines_drops_below_free_shipping() -> TestResult {
    let fixture = Fixture::from_set("cart_page")?;
    let mut shop = cart_page()?;

    shop.remove_from_cart(fixture.product_id("executive")?)?;
    shop.remove_from_cart(fixture.product_id("task")?)?;

    let summary = rounded(&shop)?;

    // Gaming Chair Pro alone: $549.99 stays above the threshold
    assert_eq!(summary.shipping, usd(0));

    shop.set_mode(PricingMode::Wholesale);

    // $379.99 wholesale is under it
    assert_eq!(rounded(&shop)?.shipping, usd(4_999));

    Ok(())
}

#[test]
fn out_of_stock_line_cannot_grow() -> TestResult {
    let fixture = Fixture::from_set("cart_page")?;
    let gaming = fixture.product_id("gaming")?;
    let mut shop = cart_page()?;

    assert!(matches!(
        shop.increment(gaming),
        Err(StorefrontError::Cart(_))
    ));

    assert_eq!(shop.cart().get(gaming).map(|line| line.quantity()), Some(1));

    Ok(())
}

#[test]
fn receipt_lists_every_line() -> TestResult {
    let mut shop = cart_page()?;

    shop.apply_promotion("WELCOME20")?;

    let receipt = shop.receipt()?;
    let mut out = Vec::new();

    receipt.write_to(&mut out)?;

    let text = String::from_utf8(out)?;

    assert_eq!(receipt.lines().len(), 3);
    assert!(text.contains("Executive Office Chair"));
    assert!(text.contains("Gaming Chair Pro"));
    assert!(text.contains("WELCOME20"));
    assert!(text.contains("FREE"));

    Ok(())
}

#[test]
fn chair_builder_configuration() -> TestResult {
    let options = OptionSet::chair_builder();
    let base = OptionSet::chair_builder_base_price();
    let mut configuration = options.configure();

    assert_eq!(configuration.price(&base)?, usd(50_000));

    configuration
        .select("backrest", "Genuine Leather")?
        .select("seat", "Memory Foam")?
        .select("base", "Aluminum Base")?;

    // $500 + $150 + $75 + $120
    assert_eq!(configuration.price(&base)?, usd(84_500));

    Ok(())
}
