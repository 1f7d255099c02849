//! Money
//!
//! Prices are stored as [`Money`] in minor units. Anything derived from them (line totals,
//! discounts, tax) is carried as a full-precision [`Decimal`] and only converted back to
//! [`Money`] when it is displayed.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Findable, Money, iso::Currency};
use thiserror::Error;

/// A price in a concrete ISO currency.
pub type Price = Money<'static, Currency>;

/// Errors raised while parsing or converting monetary values.
#[derive(Debug, Error, PartialEq)]
pub enum MoneyParseError {
    /// The string was not in the `AMOUNT CURRENCY` format.
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// The currency code is not a known ISO currency.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The rate was neither `N%` nor a plain decimal.
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// The amount does not fit in `i64` minor units.
    #[error("Amount {0} cannot be represented in minor units")]
    Overflow(Decimal),
}

/// Convert a price into a decimal amount in major units (e.g. `899.99`).
pub fn to_decimal(price: &Price) -> Decimal {
    Decimal::new(price.to_minor_units(), price.currency().exponent)
}

/// Round a decimal amount to the currency's minor unit and wrap it as a price.
///
/// Midpoints round away from zero.
///
/// # Errors
///
/// Returns [`MoneyParseError::Overflow`] if the rounded amount does not fit in minor units.
pub fn from_decimal(amount: Decimal, currency: &'static Currency) -> Result<Price, MoneyParseError> {
    let minor = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .and_then(|scale| amount.checked_mul(scale))
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .ok_or(MoneyParseError::Overflow(amount))?;

    Ok(Money::from_minor(minor, currency))
}

/// Parse a price string such as `"899.99 USD"`.
///
/// # Errors
///
/// Returns an error if the string is not `AMOUNT CURRENCY`, the amount is not a decimal,
/// or the currency code is unknown.
pub fn parse_price(s: &str) -> Result<Price, MoneyParseError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(MoneyParseError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| MoneyParseError::InvalidPrice(s.to_string()))?;

    let currency =
        Currency::find(code).ok_or_else(|| MoneyParseError::UnknownCurrency(code.to_string()))?;

    from_decimal(amount, currency)
}

/// Parse a rate written either as `"8%"` or as a fraction `"0.08"`.
///
/// # Errors
///
/// Returns [`MoneyParseError::InvalidPercentage`] if the value is not a decimal number.
pub fn parse_rate(s: &str) -> Result<Percentage, MoneyParseError> {
    let trimmed = s.trim();

    let value = if let Some(points) = trimmed.strip_suffix('%') {
        points
            .trim()
            .parse::<Decimal>()
            .map(|points| points / Decimal::ONE_HUNDRED)
    } else {
        trimmed.parse::<Decimal>()
    };

    value
        .map(Percentage::from)
        .map_err(|_err| MoneyParseError::InvalidPercentage(s.to_string()))
}

/// The fraction a rate represents, e.g. `0.08` for 8%.
pub fn rate_fraction(rate: Percentage) -> Decimal {
    rate * Decimal::ONE
}
