//! Quantity selector
//!
//! The bounded counter shown next to "Add to cart" on a product page.

use rust_decimal::Decimal;

use crate::money::{Price, to_decimal};

/// Most units a single "Add to cart" can request.
pub const MAX_SELECTABLE_QUANTITY: u32 = 10;

/// Counter bounded to `1..=MAX_SELECTABLE_QUANTITY`. Changes that would leave the bounds
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantitySelector {
    value: u32,
}

impl Default for QuantitySelector {
    fn default() -> Self {
        Self { value: 1 }
    }
}

impl QuantitySelector {
    /// Selected quantity
    #[must_use]
    pub fn value(self) -> u32 {
        self.value
    }

    /// Apply a relative change. Returns whether the value changed.
    pub fn adjust(&mut self, change: i32) -> bool {
        let next = i64::from(self.value) + i64::from(change);

        match u32::try_from(next) {
            Ok(next) if (1..=MAX_SELECTABLE_QUANTITY).contains(&next) => {
                let changed = next != self.value;
                self.value = next;
                changed
            }
            _ => false,
        }
    }

    /// Add one, unless already at the maximum.
    pub fn increment(&mut self) -> bool {
        self.adjust(1)
    }

    /// Remove one, unless already at one.
    pub fn decrement(&mut self) -> bool {
        self.adjust(-1)
    }

    /// Whether the decrement control should be enabled.
    #[must_use]
    pub fn can_decrement(self) -> bool {
        self.value > 1
    }

    /// Whether the increment control should be enabled.
    #[must_use]
    pub fn can_increment(self) -> bool {
        self.value < MAX_SELECTABLE_QUANTITY
    }

    /// Amount shown on the "Add to cart" button.
    #[must_use]
    pub fn total_for(self, unit_price: &Price) -> Decimal {
        to_decimal(unit_price) * Decimal::from(self.value)
    }
}
