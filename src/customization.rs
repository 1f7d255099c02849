//! Customization
//!
//! Option groups that adjust a base price: the chair builder and the material picker on a
//! product page. One option is selected per group, defaulting to the first.

use rusty_money::{Money, MoneyError, iso::USD};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{money::Price, products::Product};

/// Errors that can occur while configuring or pricing a customization.
#[derive(Debug, Error)]
pub enum CustomizationError {
    /// No group with this name.
    #[error("Unknown option group: {0}")]
    UnknownGroup(String),

    /// The group has no option with this name.
    #[error("Unknown {group} option: {option}")]
    UnknownOption {
        /// Group searched
        group: String,

        /// Requested option
        option: String,
    },

    /// A group was defined without options.
    #[error("Option group {0} has no options")]
    EmptyGroup(String),

    /// The configured price came out below zero.
    #[error("Configured price {0} is negative")]
    NegativePrice(String),

    /// Wrapper for money errors, including currency mismatches.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// One choice within a group and its price adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomizationOption {
    name: String,
    price_delta: Price,
}

impl CustomizationOption {
    /// Create an option.
    pub fn new(name: impl Into<String>, price_delta: Price) -> Self {
        Self {
            name: name.into(),
            price_delta,
        }
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Amount added to (or, if negative, taken off) the base price
    #[must_use]
    pub fn price_delta(&self) -> Price {
        self.price_delta
    }
}

/// A named group of mutually exclusive options.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionGroup {
    name: String,
    options: SmallVec<[CustomizationOption; 3]>,
}

impl OptionGroup {
    /// Create a group. The first option is the default selection.
    ///
    /// # Errors
    ///
    /// Returns [`CustomizationError::EmptyGroup`] if `options` is empty.
    pub fn new(
        name: impl Into<String>,
        options: impl IntoIterator<Item = CustomizationOption>,
    ) -> Result<Self, CustomizationError> {
        let name = name.into();
        let options: SmallVec<[CustomizationOption; 3]> = options.into_iter().collect();

        if options.is_empty() {
            return Err(CustomizationError::EmptyGroup(name));
        }

        Ok(Self { name, options })
    }

    /// Group name, e.g. `backrest`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Options in display order
    #[must_use]
    pub fn options(&self) -> &[CustomizationOption] {
        &self.options
    }

    fn position(&self, option: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|candidate| candidate.name.eq_ignore_ascii_case(option))
    }
}

/// An ordered collection of option groups.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSet {
    groups: SmallVec<[OptionGroup; 5]>,
}

fn usd(dollars: i64) -> Price {
    Money::from_minor(dollars * 100, USD)
}

fn group(name: &str, options: &[(&str, i64)]) -> OptionGroup {
    OptionGroup {
        name: name.to_string(),
        options: options
            .iter()
            .map(|&(option, dollars)| CustomizationOption::new(option, usd(dollars)))
            .collect(),
    }
}

impl OptionSet {
    /// Create a set from groups.
    pub fn new(groups: impl IntoIterator<Item = OptionGroup>) -> Self {
        Self {
            groups: groups.into_iter().collect(),
        }
    }

    /// The chair builder's five groups, priced in USD.
    #[must_use]
    pub fn chair_builder() -> Self {
        Self::new([
            group(
                "backrest",
                &[
                    ("Standard Mesh", 0),
                    ("Premium Fabric", 50),
                    ("Genuine Leather", 150),
                ],
            ),
            group("seat", &[("Standard Foam", 0), ("Memory Foam", 75)]),
            group(
                "armrests",
                &[("Fixed Armrests", 0), ("Adjustable Armrests", 100)],
            ),
            group("base", &[("Nylon Base", 0), ("Aluminum Base", 120)]),
            group(
                "casters",
                &[("Standard Casters", 0), ("Rollerblade Casters", 40)],
            ),
        ])
    }

    /// Base price of the chair builder
    #[must_use]
    pub fn chair_builder_base_price() -> Price {
        usd(500)
    }

    /// Upholstery choices on a product page, relative to the listed retail price.
    #[must_use]
    pub fn materials() -> Self {
        Self::new([group(
            "material",
            &[
                ("Genuine Leather", 0),
                ("Premium Fabric", -100),
                ("Breathable Mesh", -50),
            ],
        )])
    }

    /// Groups in display order
    #[must_use]
    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }

    /// A configuration with the first option of every group selected.
    #[must_use]
    pub fn configure(&self) -> Configuration<'_> {
        Configuration {
            set: self,
            selections: self.groups.iter().map(|_| 0).collect(),
        }
    }
}

/// The selected option of each group in an [`OptionSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration<'s> {
    set: &'s OptionSet,
    selections: SmallVec<[usize; 5]>,
}

impl<'s> Configuration<'s> {
    /// Select `option` in `group`. Names are matched ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns a [`CustomizationError`] if the group or option does not exist.
    pub fn select(&mut self, group: &str, option: &str) -> Result<&mut Self, CustomizationError> {
        let index = self
            .set
            .groups
            .iter()
            .position(|candidate| candidate.name.eq_ignore_ascii_case(group))
            .ok_or_else(|| CustomizationError::UnknownGroup(group.to_string()))?;

        let chosen = self
            .set
            .groups
            .get(index)
            .and_then(|candidate| candidate.position(option))
            .ok_or_else(|| CustomizationError::UnknownOption {
                group: group.to_string(),
                option: option.to_string(),
            })?;

        if let Some(selection) = self.selections.get_mut(index) {
            *selection = chosen;
        }

        debug!(group, option, "selected customization option");

        Ok(self)
    }

    /// Selected option per group, in group order.
    pub fn selected(&self) -> impl Iterator<Item = (&'s OptionGroup, &'s CustomizationOption)> {
        let set: &'s OptionSet = self.set;

        set.groups
            .iter()
            .zip(self.selections.iter())
            .filter_map(|(group, &selection)| {
                group.options.get(selection).map(|option| (group, option))
            })
    }

    /// Sum of the selected price adjustments, in the currency of `base`.
    ///
    /// # Errors
    ///
    /// Returns a [`CustomizationError`] if an option is priced in another currency.
    pub fn options_total(&self, base: &Price) -> Result<Price, CustomizationError> {
        self.selected()
            .try_fold(Money::from_minor(0, base.currency()), |total, (_, option)| {
                total.add(option.price_delta)
            })
            .map_err(CustomizationError::from)
    }

    /// `base` plus every selected adjustment.
    ///
    /// # Errors
    ///
    /// Returns [`CustomizationError::NegativePrice`] if the result is below zero, or a
    /// money error on currency mismatch.
    pub fn price(&self, base: &Price) -> Result<Price, CustomizationError> {
        let price = base.add(self.options_total(base)?)?;

        if price.to_minor_units() < 0 {
            return Err(CustomizationError::NegativePrice(price.to_string()));
        }

        Ok(price)
    }
}

/// Price of a product with the selected material, and how much it saves against the
/// original price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailPrice {
    /// Retail price plus the material adjustment
    pub current: Price,

    /// Original price minus current price, when the product has an original price and the
    /// difference is positive
    pub savings: Option<Price>,
}

/// Price a product page with the given material configuration.
///
/// # Errors
///
/// Returns a [`CustomizationError`] if the configured price is negative or currencies differ.
pub fn detail_price(
    product: &Product,
    configuration: &Configuration<'_>,
) -> Result<DetailPrice, CustomizationError> {
    let current = configuration.price(&product.retail_price())?;

    let savings = match product.original_price() {
        Some(original) => {
            let savings = original.sub(current)?;

            (savings.to_minor_units() > 0).then_some(savings)
        }
        None => None,
    };

    Ok(DetailPrice { current, savings })
}
