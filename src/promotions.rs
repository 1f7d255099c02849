//! Promotions
//!
//! Promotion codes typed by the shopper. Each code takes a fixed percentage off the order
//! subtotal. Codes are matched case-insensitively and at most one is active at a time.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::money::rate_fraction;

/// Errors related to promotion codes.
#[derive(Debug, Error, PartialEq)]
pub enum PromotionError {
    /// No promotion matches the input.
    #[error("Invalid promo code: {0}")]
    InvalidCode(String),

    /// The rate is outside 0% to 100%.
    #[error("Promotion {0} must take between 0% and 100% off")]
    InvalidRate(String),

    /// The code is already in the table.
    #[error("Duplicate promotion code: {0}")]
    DuplicateCode(String),

    /// An empty code.
    #[error("Promotion code must not be blank")]
    BlankCode,
}

/// A promotion code and the share of the subtotal it takes off.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionCode {
    code: String,
    rate: Percentage,
}

impl PromotionCode {
    /// Create a promotion. The code is stored upper-cased.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the code is blank or the rate is outside `0..=1`.
    pub fn new(code: &str, rate: Percentage) -> Result<Self, PromotionError> {
        let code = code.trim().to_uppercase();

        if code.is_empty() {
            return Err(PromotionError::BlankCode);
        }

        let fraction = rate_fraction(rate);

        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(PromotionError::InvalidRate(code));
        }

        Ok(Self { code, rate })
    }

    /// Canonical (upper-case) code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Share of the subtotal taken off
    #[must_use]
    pub fn rate(&self) -> Percentage {
        self.rate
    }

    /// Discount on `subtotal`, at full precision.
    #[must_use]
    pub fn discount_on(&self, subtotal: Decimal) -> Decimal {
        self.rate * subtotal
    }
}

/// The set of codes the shop accepts.
#[derive(Debug, Clone, Default)]
pub struct PromotionTable {
    codes: FxHashMap<String, PromotionCode>,
}

impl PromotionTable {
    /// The shop's standard codes: `SAVE10` (10% off) and `WELCOME20` (20% off).
    #[must_use]
    pub fn standard() -> Self {
        let mut codes = FxHashMap::default();

        for (code, percent) in [("SAVE10", 10), ("WELCOME20", 20)] {
            let promotion = PromotionCode {
                code: code.to_string(),
                rate: Percentage::from(Decimal::new(percent, 2)),
            };

            codes.insert(code.to_lowercase(), promotion);
        }

        Self { codes }
    }

    /// Add a code.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::DuplicateCode`] if the code (ignoring case) already exists.
    pub fn insert(&mut self, promotion: PromotionCode) -> Result<(), PromotionError> {
        let key = promotion.code.to_lowercase();

        if self.codes.contains_key(&key) {
            return Err(PromotionError::DuplicateCode(promotion.code));
        }

        self.codes.insert(key, promotion);

        Ok(())
    }

    /// Find the promotion for shopper input, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidCode`] if nothing matches.
    pub fn lookup(&self, input: &str) -> Result<&PromotionCode, PromotionError> {
        self.codes
            .get(&input.to_lowercase())
            .ok_or_else(|| PromotionError::InvalidCode(input.to_string()))
    }

    /// Codes sorted alphabetically.
    #[must_use]
    pub fn codes(&self) -> Vec<&PromotionCode> {
        let mut codes: Vec<&PromotionCode> = self.codes.values().collect();
        codes.sort_by(|a, b| a.code.cmp(&b.code));
        codes
    }

    /// Number of codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no codes are accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn standard_codes_match_case_insensitively() -> TestResult {
        let table = PromotionTable::standard();

        assert_eq!(table.lookup("save10")?.code(), "SAVE10");
        assert_eq!(table.lookup("Welcome20")?.code(), "WELCOME20");
        assert_eq!(
            rate_fraction(table.lookup("SAVE10")?.rate()),
            Decimal::new(1, 1)
        );

        Ok(())
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let table = PromotionTable::standard();

        assert_eq!(
            table.lookup("XYZ"),
            Err(PromotionError::InvalidCode("XYZ".to_string()))
        );
        assert!(table.lookup(" save10").is_err());
    }

    #[test]
    fn discount_keeps_full_precision() -> TestResult {
        let table = PromotionTable::standard();

        let discount = table.lookup("SAVE10")?.discount_on(Decimal::new(274_996, 2));

        assert_eq!(discount, Decimal::new(274_996, 3));

        Ok(())
    }

    #[test]
    fn rates_outside_zero_to_one_are_rejected() {
        let result = PromotionCode::new("GREEDY", Percentage::from(Decimal::new(15, 1)));

        assert_eq!(result, Err(PromotionError::InvalidRate("GREEDY".to_string())));
    }

    #[test]
    fn insert_rejects_duplicates_ignoring_case() -> TestResult {
        let mut table = PromotionTable::standard();

        table.insert(PromotionCode::new("spring5", Percentage::from(Decimal::new(5, 2)))?)?;

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.insert(PromotionCode::new("Save10", Percentage::from(Decimal::new(5, 2)))?),
            Err(PromotionError::DuplicateCode("SAVE10".to_string()))
        );

        let codes: Vec<&str> = table.codes().iter().map(|promo| promo.code()).collect();

        assert_eq!(codes, vec!["SAVE10", "SPRING5", "WELCOME20"]);

        Ok(())
    }

    #[test]
    fn blank_codes_are_rejected() {
        assert_eq!(
            PromotionCode::new("   ", Percentage::from(Decimal::new(5, 2))),
            Err(PromotionError::BlankCode)
        );
    }
}
