//! Perch CLI

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use perch::{
    catalog::{
        Catalog,
        filter::{CategoryFilter, PriceRange, ProductFilter},
    },
    customization::OptionSet,
    fixtures::Fixture,
    intro::{FileStore, WelcomeIntro},
    money::{from_decimal, to_decimal},
    pricing::PricingMode,
    storefront::Storefront,
};

#[derive(Debug, Parser)]
#[command(name = "perch", about = "Office-chair storefront pricing", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    /// Directory containing `catalog/`, `carts/` and `config/` fixtures
    #[arg(long, global = true, env = "PERCH_FIXTURES", default_value = "./fixtures")]
    fixtures: PathBuf,

    /// Catalog fixture name. `cart` falls back to the catalog named after its cart fixture,
    /// `products` to the built-in catalog.
    #[arg(short, long, global = true, env = "PERCH_CATALOG")]
    catalog: Option<String>,

    /// Pricing config fixture name; the default terms are used when omitted
    #[arg(long, global = true, env = "PERCH_CONFIG")]
    config: Option<String>,

    /// Show wholesale prices
    #[arg(short, long, global = true)]
    wholesale: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products matching a category and price range
    Products(ProductsArgs),

    /// Print the receipt for a cart fixture
    Cart(CartArgs),

    /// Price a custom chair
    Customize(CustomizeArgs),

    /// Show or dismiss the welcome intro
    Intro(IntroArgs),
}

#[derive(Debug, Args)]
struct ProductsArgs {
    /// `all` or a category name
    #[arg(long, default_value = "all")]
    category: CategoryFilter,

    /// Lowest price shown, in major units
    #[arg(long)]
    min: Option<Decimal>,

    /// Highest price shown, in major units
    #[arg(long)]
    max: Option<Decimal>,
}

#[derive(Debug, Args)]
struct CartArgs {
    /// Cart fixture name
    #[arg(short, long, default_value = "cart_page")]
    fixture: String,

    /// Promotion code to apply
    #[arg(short, long)]
    promo: Option<String>,
}

#[derive(Debug, Args)]
struct CustomizeArgs {
    /// Backrest option
    #[arg(long)]
    backrest: Option<String>,

    /// Seat option
    #[arg(long)]
    seat: Option<String>,

    /// Armrests option
    #[arg(long)]
    armrests: Option<String>,

    /// Base option
    #[arg(long)]
    base: Option<String>,

    /// Casters option
    #[arg(long)]
    casters: Option<String>,
}

#[derive(Debug, Args)]
struct IntroArgs {
    /// File holding persisted shopper state
    #[arg(long, env = "PERCH_STATE", default_value = ".perch-state.yml")]
    store: PathBuf,

    /// Record the intro as seen
    #[arg(long)]
    dismiss: bool,
}

pub fn main() -> ExitCode {
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(clippy::print_stderr, reason = "error report for the CLI user")]
            {
                eprintln!("Error: {error:#}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Products(args) => products(&cli, args),
        Commands::Cart(args) => cart(&cli, args),
        Commands::Customize(args) => customize(args),
        Commands::Intro(args) => intro(args),
    }
}

/// Fixture names picked on the command line.
#[derive(Debug, Clone, Copy, Default)]
struct Selection<'a> {
    catalog: Option<&'a str>,
    config: Option<&'a str>,
    cart: Option<&'a str>,
}

impl<'a> Selection<'a> {
    fn from_cli(cli: &'a Cli) -> Self {
        Self {
            catalog: cli.catalog.as_deref(),
            config: cli.config.as_deref(),
            cart: None,
        }
    }
}

/// Build the storefront for `selection` from fixtures under `base`.
///
/// Without a catalog name the catalog fixture named after the cart is used, and with no
/// cart either the built-in catalog.
fn open_storefront(base: &Path, selection: Selection<'_>, mode: PricingMode) -> Result<Storefront> {
    let mut fixture = Fixture::with_base_path(base);

    if let Some(config) = selection.config {
        fixture
            .load_config(config)
            .with_context(|| format!("loading config fixture `{config}`"))?;
    }

    let catalog = match selection.catalog.or(selection.cart) {
        Some(name) => {
            fixture
                .load_catalog(name)
                .with_context(|| format!("loading catalog fixture `{name}`"))?;

            fixture.catalog()?
        }
        None => Catalog::storefront()?,
    };

    debug!(products = catalog.len(), "catalog loaded");

    let mut shop = match selection.cart {
        Some(name) => {
            fixture
                .load_cart(name)
                .with_context(|| format!("loading cart fixture `{name}`"))?;

            let cart = fixture.cart(&catalog)?;

            Storefront::new(catalog, fixture.config()).with_cart(cart)
        }
        None => Storefront::new(catalog, fixture.config()),
    };

    shop.set_mode(mode);

    Ok(shop)
}

fn mode(cli: &Cli) -> PricingMode {
    if cli.wholesale {
        PricingMode::Wholesale
    } else {
        PricingMode::Retail
    }
}

fn products(cli: &Cli, args: &ProductsArgs) -> Result<()> {
    let shop = open_storefront(&cli.fixtures, Selection::from_cli(cli), mode(cli))?;
    let currency = shop.catalog().currency();
    let defaults = PriceRange::default_for(currency);

    let min = args.min.unwrap_or_else(|| to_decimal(&defaults.min()));
    let max = args.max.unwrap_or_else(|| to_decimal(&defaults.max()));

    let filter = ProductFilter::new(
        args.category,
        PriceRange::new(from_decimal(min, currency)?, from_decimal(max, currency)?)?,
    );

    let mut out = io::stdout().lock();

    writeln!(out, "Categories:")?;

    for (category, count) in shop.catalog().category_counts() {
        writeln!(out, "  {category:<12} {count}")?;
    }

    shop.write_listing(&mut out, &filter)?;

    Ok(())
}

fn cart(cli: &Cli, args: &CartArgs) -> Result<()> {
    let selection = Selection {
        cart: Some(args.fixture.as_str()),
        ..Selection::from_cli(cli)
    };

    let mut shop = open_storefront(&cli.fixtures, selection, mode(cli))?;

    if let Some(code) = &args.promo {
        shop.apply_promotion(code)?;
    }

    let mut out = io::stdout().lock();

    shop.receipt()?.write_to(&mut out)?;

    for shortfall in shop.wholesale_shortfalls()? {
        let name = shop.catalog().product(shortfall.product)?.name();

        writeln!(
            out,
            "Minimum order for {name} is {} (cart has {})",
            shortfall.required, shortfall.actual
        )?;
    }

    Ok(())
}

fn customize(args: &CustomizeArgs) -> Result<()> {
    let options = OptionSet::chair_builder();
    let mut configuration = options.configure();

    for (group, choice) in [
        ("backrest", &args.backrest),
        ("seat", &args.seat),
        ("armrests", &args.armrests),
        ("base", &args.base),
        ("casters", &args.casters),
    ] {
        if let Some(choice) = choice {
            configuration.select(group, choice)?;
        }
    }

    let base = OptionSet::chair_builder_base_price();
    let mut out = io::stdout().lock();

    for (group, option) in configuration.selected() {
        writeln!(
            out,
            "{:<10} {:<22} {}",
            group.name(),
            option.name(),
            option.price_delta()
        )?;
    }

    writeln!(out, "Base price:    {base}")?;
    writeln!(out, "Options:       {}", configuration.options_total(&base)?)?;
    writeln!(out, "Total price:   {}", configuration.price(&base)?)?;

    Ok(())
}

fn intro(args: &IntroArgs) -> Result<()> {
    let mut intro = WelcomeIntro::load(FileStore::new(&args.store))?;
    let mut out = io::stdout().lock();

    if args.dismiss {
        intro.dismiss()?;
    }

    if intro.should_show() {
        writeln!(out, "Welcome! Take the tour before you shop.")?;
    } else {
        writeln!(out, "Welcome intro already seen.")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;

    const FIXTURES: &str = "./fixtures";

    fn cart_page<'a>() -> Selection<'a> {
        Selection {
            cart: Some("cart_page"),
            ..Selection::default()
        }
    }

    #[test]
    fn cart_without_catalog_uses_catalog_named_after_cart() -> TestResult {
        let shop = open_storefront(Path::new(FIXTURES), cart_page(), PricingMode::Retail)?;

        assert_eq!(shop.catalog().len(), 3);
        assert_eq!(shop.cart().len(), 3);
        assert_eq!(
            shop.summary()?.rounded()?.total,
            Money::from_minor(296_996, USD)
        );

        Ok(())
    }

    #[test]
    fn cart_with_promotion_and_config() -> TestResult {
        let selection = Selection {
            config: Some("default"),
            ..cart_page()
        };

        let mut shop = open_storefront(Path::new(FIXTURES), selection, PricingMode::Retail)?;

        shop.apply_promotion("save10")?;

        assert_eq!(
            shop.summary()?.rounded()?.total,
            Money::from_minor(267_296, USD)
        );

        Ok(())
    }

    #[test]
    fn explicit_catalog_wins_over_cart_name() -> TestResult {
        let selection = Selection {
            catalog: Some("storefront"),
            cart: Some("storefront"),
            ..Selection::default()
        };

        let shop = open_storefront(Path::new(FIXTURES), selection, PricingMode::Wholesale)?;

        assert_eq!(shop.catalog().len(), 8);
        assert!(shop.mode().is_wholesale());
        assert!(!shop.wholesale_shortfalls()?.is_empty());

        Ok(())
    }

    #[test]
    fn listing_without_fixtures_uses_builtin_catalog() -> TestResult {
        let shop = open_storefront(
            Path::new("./does-not-exist"),
            Selection::default(),
            PricingMode::Retail,
        )?;

        assert_eq!(shop.catalog().len(), Catalog::storefront()?.len());
        assert!(shop.cart().is_empty());

        Ok(())
    }

    #[test]
    fn log_level_flag_defaults_to_warn() -> TestResult {
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from(["perch", "cart"])?;

        assert_eq!(cli.log_level, "warn");

        let cli = Cli::try_parse_from(["perch", "--log-level", "debug", "cart", "--promo", "SAVE10"])?;

        assert_eq!(cli.log_level, "debug");
        assert!(matches!(
            cli.command,
            Commands::Cart(CartArgs { ref fixture, promo: Some(ref promo) })
                if fixture == "cart_page" && promo == "SAVE10"
        ));

        Ok(())
    }

    #[test]
    fn unknown_cart_fixture_is_reported() {
        let selection = Selection {
            cart: Some("no_such_cart"),
            ..Selection::default()
        };

        assert!(open_storefront(Path::new(FIXTURES), selection, PricingMode::Retail).is_err());
    }
}
