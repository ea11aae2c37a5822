//! Money amounts in Colombian pesos.
//!
//! The store API serializes decimals as strings (`"1250000.00"`) but some
//! aggregate endpoints return plain JSON numbers. [`Money`] accepts both.
//!
//! Display follows es-CO conventions: `.` groups thousands and `,` separates
//! the fractional part.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// An amount of money.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero pesos.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Whole pesos.
    #[must_use]
    pub fn from_pesos(pesos: i64) -> Self {
        Self(Decimal::from(pesos))
    }

    /// The underlying decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Round half away from zero to `dp` decimal places.
    #[must_use]
    pub fn round_dp(&self, dp: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Clamp negative amounts to zero.
    #[must_use]
    pub fn max_zero(self) -> Self {
        if self.0 < Decimal::ZERO {
            Self::zero()
        } else {
            self
        }
    }

    /// Parse a form value such as `"1250000"` or `"1250000.50"`.
    ///
    /// Returns `None` for empty or malformed input.
    #[must_use]
    pub fn parse_input(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Decimal::from_str(trimmed).ok().map(Self)
    }

    /// Format as whole pesos: `$1.234.568`.
    #[must_use]
    pub fn format_cop(&self) -> String {
        let rounded = self.round_dp(0);
        let body = group_thousands(&rounded.0.abs().trunc().to_string());
        if rounded.is_negative() {
            format!("-${body}")
        } else {
            format!("${body}")
        }
    }

    /// Format with cents: `$1.234.567,89`.
    #[must_use]
    pub fn format_cop_cents(&self) -> String {
        let rounded = self.round_dp(2);
        let abs = rounded.0.abs();
        let int_part = group_thousands(&abs.trunc().to_string());
        let cents = (abs.fract() * Decimal::ONE_HUNDRED).trunc();
        let sign = if rounded.is_negative() { "-" } else { "" };
        format!("{sign}${int_part},{:0>2}", cents.to_string())
    }
}

/// Insert `.` every three digits from the right of an unsigned integer string.
pub(crate) fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_cop())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

// Arithmetic saturates at the `Decimal` bounds.
impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0.saturating_mul(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Self> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor).map(Self)
    }
}

// =============================================================================
// Lenient decimal decoding
// =============================================================================

/// Accepts decimals encoded as strings, integers, or floats.
///
/// Floats go through their shortest string form so `12.3` decodes as
/// exactly `12.3` rather than its binary approximation.
pub(crate) struct DecimalVisitor;

impl Visitor<'_> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or numeric string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(Decimal::ZERO);
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        let text = v.to_string();
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| E::invalid_value(de::Unexpected::Float(v), &self))
    }
}
