//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use joyeria_core::{Grams, Money};
use rust_decimal::Decimal;

use crate::api::parse_date_prefix;

const PLACEHOLDER: &str = "—";

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Values the money filters accept: `Money`, raw `Decimal`, or a reference
/// to either.
pub trait Amount {
    fn to_money(&self) -> Money;
}

impl Amount for Money {
    fn to_money(&self) -> Money {
        *self
    }
}

impl Amount for Decimal {
    fn to_money(&self) -> Money {
        Money::new(*self)
    }
}

impl<T: Amount + ?Sized> Amount for &T {
    fn to_money(&self) -> Money {
        (**self).to_money()
    }
}

/// Values the weight filter accepts.
pub trait Weight {
    fn to_grams(&self) -> Grams;
}

impl Weight for Grams {
    fn to_grams(&self) -> Grams {
        *self
    }
}

impl Weight for Decimal {
    fn to_grams(&self) -> Grams {
        Grams::new(*self)
    }
}

impl<T: Weight + ?Sized> Weight for &T {
    fn to_grams(&self) -> Grams {
        (**self).to_grams()
    }
}

/// Formats an amount as whole pesos: `$1.234.568`.
///
/// Usage in templates: `{{ account.saldo_actual|cop }}`
#[askama::filter_fn]
pub fn cop(value: impl Amount, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.to_money().format_cop())
}

/// Formats an amount with cents: `$1.234.567,89`.
///
/// Usage in templates: `{{ closure.saldo_final|cop_cents }}`
#[askama::filter_fn]
pub fn cop_cents(value: impl Amount, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.to_money().format_cop_cents())
}

/// Formats a weight: `1.234,57 g`.
///
/// Usage in templates: `{{ summary.total|grams }}`
#[askama::filter_fn]
pub fn grams(value: impl Weight, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.to_grams().format())
}

/// Renders an ISO date or timestamp as `dd/mm/yyyy`, or a dash when missing.
///
/// Usage in templates: `{{ sale.fecha|date }}`
#[askama::filter_fn]
pub fn date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_date(&value.to_string()))
}

/// Renders an ISO timestamp as `dd/mm/yyyy hh:mm`, or a dash when missing.
///
/// Usage in templates: `{{ movement.fecha|datetime }}`
#[askama::filter_fn]
pub fn datetime(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_datetime(&value.to_string()))
}

pub(crate) fn format_date(text: &str) -> String {
    parse_date_prefix(text).map_or_else(
        || PLACEHOLDER.to_string(),
        |d| d.format("%d/%m/%Y").to_string(),
    )
}

pub(crate) fn format_datetime(text: &str) -> String {
    let Some(day) = parse_date_prefix(text) else {
        return PLACEHOLDER.to_string();
    };
    // "YYYY-MM-DDTHH:MM..." or "YYYY-MM-DD HH:MM..."
    match text.trim().get(11..16) {
        Some(clock) if clock.as_bytes().get(2) == Some(&b':') => {
            format!("{} {clock}", day.format("%d/%m/%Y"))
        }
        _ => day.format("%d/%m/%Y").to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::filters;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_money_amounts_keep_thousands_and_cents() {
        let receivable = Money::from_pesos(250_000);
        assert_eq!(receivable.to_money().format_cop(), "$250.000");
        assert_eq!(receivable.to_money().format_cop_cents(), "$250.000,00");

        let net = Money::new(dec("1350000.50"));
        assert_eq!((&net).to_money().format_cop_cents(), "$1.350.000,50");
        assert_eq!((&&net).to_money().format_cop(), "$1.350.001");
    }

    #[test]
    fn test_decimal_amounts_format_like_money() {
        assert_eq!(dec("1234567.891").to_money().format_cop(), "$1.234.568");
        assert_eq!(dec("1234567.891").to_money().format_cop_cents(), "$1.234.567,89");
        assert_eq!(dec("-1234").to_money().format_cop_cents(), "-$1.234,00");
    }

    #[test]
    fn test_weights_format_from_grams_and_decimal() {
        assert_eq!(Grams::new(dec("1234.567")).to_grams().format(), "1.234,57 g");
        assert_eq!((&dec("5")).to_grams().format(), "5,00 g");
    }

    #[derive(askama::Template)]
    #[template(
        source = "{{ net|cop }} {{ net|cop_cents }} {{ raw|cop_cents }} {{ weight|grams }}",
        ext = "txt"
    )]
    struct Figures {
        net: Money,
        raw: Decimal,
        weight: Grams,
    }

    #[test]
    fn test_filters_render_typed_values() {
        use askama::Template;

        let figures = Figures {
            net: Money::new(dec("1350000.50")),
            raw: dec("-1234"),
            weight: Grams::new(dec("1234.567")),
        };
        assert_eq!(
            figures.render().unwrap(),
            "$1.350.001 $1.350.000,50 -$1.234,00 1.234,57 g"
        );
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-03-09T14:22:00Z"), "09/03/2025");
        assert_eq!(format_date(""), "—");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2025-03-09T14:22:00Z"), "09/03/2025 14:22");
        assert_eq!(format_datetime("2025-03-09"), "09/03/2025");
        assert_eq!(format_datetime("ayer"), "—");
    }
}
