//! Dashboard ("Inicio") figures.

use chrono::Datelike;
use joyeria_core::Money;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{instrument, warn};

use crate::api::{ApiClient, Closure, DashboardSummary, TradePoint, parse_date_prefix};
use crate::services::debts::{DebtRow, UPCOMING_LIMIT, upcoming};

/// Closures plotted on the profit chart.
pub const PROFIT_WINDOW: usize = 7;

/// Shown when any dashboard source fails to load.
pub const LOAD_ERROR: &str = "No se pudieron cargar algunos datos del tablero.";

const MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// One closure on the profit chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitPoint {
    /// `dd mmm`, empty when the closure has no date.
    pub label: String,
    pub profit: Money,
    /// Bar width relative to the largest absolute profit, 0-100.
    pub percent: u32,
}

/// `dd mmm` with Spanish month abbreviations, e.g. `09 mar`.
#[must_use]
pub fn day_month_label(value: &str) -> String {
    parse_date_prefix(value).map_or_else(String::new, |date| {
        let month = MONTHS
            .get(date.month0() as usize)
            .copied()
            .unwrap_or_default();
        format!("{:02} {month}", date.day())
    })
}

fn percent_of(value: Decimal, max: Decimal) -> u32 {
    if max.is_zero() {
        return 0;
    }
    (value.abs() / max * Decimal::ONE_HUNDRED)
        .round()
        .to_u32()
        .unwrap_or(0)
        .min(100)
}

/// The latest closures in chronological order.
///
/// The API lists closures newest first.
#[must_use]
pub fn profit_series(closures: &[Closure]) -> Vec<ProfitPoint> {
    let window: Vec<&Closure> = closures.iter().take(PROFIT_WINDOW).rev().collect();
    let max = window
        .iter()
        .map(|c| c.profit().amount().abs())
        .max()
        .unwrap_or_default();
    window
        .into_iter()
        .map(|c| {
            let profit = c.profit();
            ProfitPoint {
                label: day_month_label(c.fecha_cierre.as_deref().unwrap_or_default()),
                profit,
                percent: percent_of(profit.amount(), max),
            }
        })
        .collect()
}

/// One day of sales versus purchases with proportional bar widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeBar {
    pub label: String,
    pub sales: Money,
    pub purchases: Money,
    pub sales_percent: u32,
    pub purchases_percent: u32,
}

/// Scale every bar against the largest sales or purchases figure.
#[must_use]
pub fn trade_bars(points: &[TradePoint]) -> Vec<TradeBar> {
    let max = points
        .iter()
        .flat_map(|p| [p.ventas.amount(), p.compras.amount()])
        .map(|d| d.abs())
        .max()
        .unwrap_or_default();
    points
        .iter()
        .map(|p| TradeBar {
            label: p.fecha.clone(),
            sales: p.ventas,
            purchases: p.compras,
            sales_percent: percent_of(p.ventas.amount(), max),
            purchases_percent: percent_of(p.compras.amount(), max),
        })
        .collect()
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub profit: Vec<ProfitPoint>,
    pub trade: Vec<TradeBar>,
    pub receivables: Vec<DebtRow>,
    pub payables: Vec<DebtRow>,
    /// Set when one or more sources failed; the rest still render.
    pub error: Option<String>,
}

/// Load every dashboard source concurrently.
///
/// Never fails: a source that cannot be loaded leaves its section empty and
/// sets [`Dashboard::error`].
#[instrument(skip(api))]
pub async fn load(api: &ApiClient) -> Dashboard {
    let (closures, summary, receivables, payables) = tokio::join!(
        api.list_closures(),
        api.dashboard_summary(),
        api.receivables(),
        api.payables(),
    );

    let mut dashboard = Dashboard::default();
    let mut failed = false;

    match closures {
        Ok(closures) => dashboard.profit = profit_series(&closures),
        Err(e) => {
            warn!(error = %e, "Failed to load closures");
            failed = true;
        }
    }
    match summary {
        Ok(summary) => {
            dashboard.trade = trade_bars(&summary.ventas_vs_compras);
            dashboard.summary = summary;
        }
        Err(e) => {
            warn!(error = %e, "Failed to load dashboard summary");
            failed = true;
        }
    }
    match receivables {
        Ok(groups) => dashboard.receivables = upcoming(&groups, UPCOMING_LIMIT),
        Err(e) => {
            warn!(error = %e, "Failed to load receivables");
            failed = true;
        }
    }
    match payables {
        Ok(groups) => dashboard.payables = upcoming(&groups, UPCOMING_LIMIT),
        Err(e) => {
            warn!(error = %e, "Failed to load payables");
            failed = true;
        }
    }

    if failed {
        dashboard.error = Some(LOAD_ERROR.to_string());
    }
    dashboard
}
