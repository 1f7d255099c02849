//! Integration tests for the bundled fixture files.

use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use perch::{
    catalog::{
        Catalog,
        filter::{CategoryFilter, PriceRange, ProductFilter},
    },
    fixtures::Fixture,
    pricing::PricingMode,
    products::Category,
    storefront::Storefront,
};

#[test]
fn storefront_yaml_matches_builtin_catalog() -> TestResult {
    let mut fixture = Fixture::new();
    fixture.load_catalog("storefront")?;

    let from_yaml = fixture.catalog()?;
    let builtin = Catalog::storefront()?;

    assert_eq!(from_yaml.len(), builtin.len());

    for (yaml, code) in from_yaml.iter().zip(builtin.iter()) {
        assert_eq!(yaml.id(), code.id());
        assert_eq!(yaml.name(), code.name());
        assert_eq!(yaml.category(), code.category());
        assert_eq!(yaml.retail_price(), code.retail_price());
        assert_eq!(yaml.wholesale_price(), code.wholesale_price());
        assert_eq!(yaml.original_price(), code.original_price());
        assert_eq!(yaml.minimum_order_quantity(), code.minimum_order_quantity());
        assert_eq!(yaml.in_stock(), code.in_stock());
    }

    Ok(())
}

#[test]
fn storefront_listing_filters_by_category_and_price() -> TestResult {
    let shop = Storefront::new(Catalog::storefront()?, Fixture::new().config());

    let gaming = ProductFilter::new(
        CategoryFilter::Only(Category::Gaming),
        PriceRange::default_for(USD),
    );

    let listed = shop.listing(&gaming);

    assert!(!listed.is_empty());
    assert!(listed.iter().all(|product| product.category() == Category::Gaming));

    let cheap = ProductFilter::new(
        CategoryFilter::All,
        PriceRange::new(Money::from_minor(0, USD), Money::from_minor(50_000, USD))?,
    );

    assert!(
        shop.listing(&cheap)
            .iter()
            .all(|product| product.retail_price().to_minor_units() <= 50_000)
    );

    Ok(())
}

#[test]
fn holiday_config_adds_its_code() -> TestResult {
    let mut fixture = Fixture::new();
    fixture.load_catalog("cart_page")?.load_cart("cart_page")?.load_config("holiday")?;

    let config = fixture.config();

    assert_eq!(config.promotions().len(), 3);
    assert_eq!(config.free_shipping_threshold(), Money::from_minor(25_000, USD));
    assert_eq!(config.flat_shipping(), Money::from_minor(2_999, USD));

    let catalog = fixture.catalog()?;
    let cart = fixture.cart(&catalog)?;
    let mut shop = Storefront::new(catalog, config).with_cart(cart);

    shop.apply_promotion("holiday25")?;

    let summary = shop.summary()?.rounded()?;

    // 25% of $2,749.96 is $687.49; tax on $2,062.47 is $164.9976
    assert_eq!(summary.discount, Money::from_minor(68_749, USD));
    assert_eq!(summary.tax, Money::from_minor(16_500, USD));
    assert_eq!(summary.total, Money::from_minor(222_747, USD));

    Ok(())
}

#[test]
fn storefront_cart_reports_wholesale_shortfalls() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;
    let catalog = fixture.catalog()?;
    let cart = fixture.cart(&catalog)?;

    let executive = fixture.product_id("executive")?;
    let task = fixture.product_id("task")?;

    let mut shop = Storefront::new(catalog, fixture.config()).with_cart(cart);
    shop.set_mode(PricingMode::Wholesale);

    let shortfalls = shop.wholesale_shortfalls()?;

    assert!(shortfalls.iter().any(|shortfall| shortfall.product == task));
    assert!(shortfalls.iter().all(|shortfall| shortfall.product != executive));

    Ok(())
}

#[test]
fn missing_fixture_is_an_error() {
    let mut fixture = Fixture::new();

    assert!(fixture.load_catalog("no_such_catalog").is_err());
}
