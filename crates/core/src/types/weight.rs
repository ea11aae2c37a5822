//! Gold weight in grams.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use super::money::{DecimalVisitor, group_thousands};

/// A weight in grams, as stored on garments and purchase lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Grams(Decimal);

impl Grams {
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Parse a form value such as `"12.5"`.
    #[must_use]
    pub fn parse_input(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Decimal::from_str(trimmed).ok().map(Self)
    }

    /// Format with two decimals and es-CO separators: `1.234,50 g`.
    #[must_use]
    pub fn format(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let abs = rounded.abs();
        let int_part = group_thousands(&abs.trunc().to_string());
        let frac = (abs.fract() * Decimal::ONE_HUNDRED).trunc();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{int_part},{:0>2} g", frac.to_string())
    }
}

impl fmt::Display for Grams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl From<Decimal> for Grams {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Grams {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

/// Grams per unit times a unit count.
impl Mul<i64> for Grams {
    type Output = Self;

    fn mul(self, units: i64) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(units)))
    }
}

impl Mul<Decimal> for Grams {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Self::Output {
        self.0.saturating_mul(rhs)
    }
}

impl Sum for Grams {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'de> Deserialize<'de> for Grams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor).map(Self)
    }
}
