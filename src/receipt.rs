//! Receipt
//!
//! Text rendering of cart lines, the order summary and product listings.

use std::{fmt::Write, io, ops::Range};

use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::LineItem,
    catalog::{Catalog, CatalogError},
    money::{MoneyParseError, Price, from_decimal},
    pricing::{PricingMode, line_total, unit_price},
    products::Product,
    summary::{OrderSummary, RoundedSummary, SummaryError},
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line refers to a product missing from the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The summary could not be rounded.
    #[error(transparent)]
    Summary(#[from] SummaryError),

    /// A line total could not be rounded.
    #[error(transparent)]
    Money(#[from] MoneyParseError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    /// Product name
    pub name: String,

    /// Units ordered
    pub quantity: u32,

    /// Unit price under the active mode
    pub unit_price: Price,

    /// Unit price times quantity, rounded
    pub line_total: Price,

    /// Whether the product can currently be purchased
    pub in_stock: bool,
}

/// Cart lines and order summary ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    lines: SmallVec<[ReceiptLine; 8]>,
    summary: RoundedSummary,
    promotion: Option<String>,
    mode: PricingMode,
}

impl Receipt {
    /// Build a receipt from cart lines and their summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a product is missing or an amount cannot be rounded.
    pub fn new(
        lines: &[LineItem],
        catalog: &Catalog,
        mode: PricingMode,
        summary: &OrderSummary,
    ) -> Result<Self, ReceiptError> {
        let lines = lines
            .iter()
            .map(|line| {
                let product = catalog.product(line.product())?;

                Ok(ReceiptLine {
                    name: product.name().to_string(),
                    quantity: line.quantity(),
                    unit_price: unit_price(product, mode),
                    line_total: from_decimal(
                        line_total(product, mode, line.quantity()),
                        catalog.currency(),
                    )?,
                    in_stock: product.in_stock(),
                })
            })
            .collect::<Result<SmallVec<_>, ReceiptError>>()?;

        Ok(Self {
            lines,
            summary: summary.rounded()?,
            promotion: summary.promotion().map(str::to_string),
            mode,
        })
    }

    /// Rendered lines in cart order
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Rounded summary
    #[must_use]
    pub fn summary(&self) -> &RoundedSummary {
        &self.summary
    }

    /// Writes the receipt as a table followed by the summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Unit Price", "Total", ""]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                line.quantity.to_string(),
                format!("{}", line.unit_price),
                format!("{}", line.line_total),
                if line.in_stock {
                    String::new()
                } else {
                    "Out of stock".to_string()
                },
            ]);
        }

        write_table(&mut out, builder, 2..5)?;

        writeln!(out, " {} pricing", self.mode).map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let summary = &self.summary;

        let discount_label = match &self.promotion {
            Some(code) => format!(" Discount ({code}):"),
            None => " Discount:".to_string(),
        };

        let shipping_val = if summary.shipping.to_minor_units() == 0 {
            "FREE  ".to_string()
        } else {
            format!("{}  ", summary.shipping)
        };

        let rows = [
            (" Subtotal:".to_string(), format!("{}  ", summary.subtotal)),
            (discount_label, format!("-{}  ", summary.discount)),
            (" Shipping:".to_string(), shipping_val),
            (" Tax:".to_string(), format!("{}  ", summary.tax)),
            (
                " \x1b[1mTotal:\x1b[0m".to_string(),
                format!("\x1b[1m{}  \x1b[0m", summary.total),
            ),
        ];

        let label_width = rows
            .iter()
            .map(|(label, _)| visible_width(label))
            .max()
            .unwrap_or_default();

        let value_width = rows
            .iter()
            .map(|(_, value)| visible_width(value))
            .max()
            .unwrap_or_default();

        for (label, value) in &rows {
            write_summary_line(out, label, value, label_width, value_width)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

/// Writes a product listing with prices under `mode`.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing fails.
pub fn write_product_table<'p>(
    mut out: impl io::Write,
    products: impl IntoIterator<Item = &'p Product>,
    mode: PricingMode,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Category", "Price", "Was", "Min Qty", "Badges"]);

    for product in products {
        let was = product
            .original_price()
            .map(|original| format!("{original}"))
            .unwrap_or_default();

        let min_qty = if mode.is_wholesale() {
            product.minimum_order_quantity().to_string()
        } else {
            String::new()
        };

        builder.push_record([
            product.id().to_string(),
            product.name().to_string(),
            product.category().to_string(),
            format!("{}", unit_price(product, mode)),
            was,
            min_qty,
            badges(product),
        ]);
    }

    write_table(&mut out, builder, 3..6)
}

fn badges(product: &Product) -> String {
    let mut badges: SmallVec<[&str; 3]> = SmallVec::new();

    if product.is_new() {
        badges.push("New");
    }

    if product.is_on_sale() {
        badges.push("Sale");
    }

    if !product.in_stock() {
        badges.push("Out of stock");
    }

    badges.join(", ")
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    amount_columns: Range<usize>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(amount_columns), Alignment::right());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

/// Wrap runs of box-drawing characters in dark grey.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        cart::Cart,
        config::PricingConfig,
        products::{Category, ProductError, ProductId},
        summary::calculate,
    };

    use super::*;

    fn chair(id: u32, name: &str, retail: i64, in_stock: bool) -> Result<Product, ProductError> {
        Ok(Product::new(
            ProductId::new(id),
            name,
            Category::Gaming,
            Money::from_minor(retail, USD),
            Money::from_minor(retail / 2, USD),
        )?
        .with_stock(in_stock))
    }

    fn catalog() -> Result<Catalog, Box<dyn std::error::Error>> {
        Ok(Catalog::with_products(
            [
                chair(1, "Gaming Chair Pro", 54_999, true)?,
                chair(2, "Conference Room Chair", 34_999, false)?,
            ],
            USD,
        )?)
    }

    #[test]
    fn receipt_lists_lines_and_summary() -> TestResult {
        let catalog = catalog()?;
        let cart = Cart::from_lines([(ProductId::new(1), 1), (ProductId::new(2), 1)], &catalog)?;
        let config = PricingConfig::default();
        let promotion = config.promotions().lookup("save10")?;

        let summary = calculate(
            cart.lines(),
            &catalog,
            PricingMode::Retail,
            Some(promotion),
            &config,
        )?;

        let receipt = Receipt::new(cart.lines(), &catalog, PricingMode::Retail, &summary)?;

        assert_eq!(receipt.lines().len(), 2);
        assert_eq!(
            receipt.lines().iter().map(|line| line.in_stock).collect::<Vec<_>>(),
            vec![true, false]
        );

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Gaming Chair Pro"));
        assert!(output.contains("Conference Room Chair"));
        assert!(output.contains("Out of stock"));
        assert!(output.contains("$549.99"));
        assert!(output.contains("$349.99"));
        assert!(output.contains("Discount (SAVE10):"));
        assert!(output.contains("$90.00"));
        assert!(output.contains("FREE"));

        Ok(())
    }

    #[test]
    fn receipt_shows_flat_shipping_for_small_orders() -> TestResult {
        let catalog = catalog()?;
        let cart = Cart::from_lines([(ProductId::new(2), 1)], &catalog)?;

        let summary = calculate(
            cart.lines(),
            &catalog,
            PricingMode::Retail,
            None,
            &PricingConfig::default(),
        )?;

        let receipt = Receipt::new(cart.lines(), &catalog, PricingMode::Retail, &summary)?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("$49.99"));
        assert!(!output.contains("FREE"));

        Ok(())
    }

    #[test]
    fn product_table_shows_wholesale_minimums() -> TestResult {
        let catalog = Catalog::with_products(
            [chair(1, "Gaming Chair Pro", 54_999, true)?.with_minimum_order_quantity(12)?],
            USD,
        )?;

        let mut out = Vec::new();
        write_product_table(&mut out, catalog.iter(), PricingMode::Wholesale)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Gaming Chair Pro"));
        assert!(output.contains("gaming"));
        assert!(output.contains("$274.99"));
        assert!(output.contains("12"));

        Ok(())
    }

    #[test]
    fn visible_width_ignores_ansi_sequences() {
        assert_eq!(visible_width("\x1b[1mTotal:\x1b[0m"), 6);
    }
}
