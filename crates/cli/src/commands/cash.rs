//! Register summary report.

use std::fmt::Write;

use joyeria_admin::api::ApiClient;
use joyeria_admin::services::cash::CashSummary;

use super::{CliError, emit};

/// Fetch balances and debts, then print gross, receivable, payable, and net.
///
/// # Errors
///
/// Returns an error if any of the three sources cannot be loaded.
pub async fn summary(api: &ApiClient) -> Result<(), CliError> {
    let (accounts, receivables, payables) =
        tokio::join!(api.list_accounts(), api.receivables(), api.payables());
    let summary = CashSummary::compute(&accounts?, &receivables?, &payables?);
    emit(&render(&summary));
    Ok(())
}

fn render(summary: &CashSummary) -> String {
    let mut out = String::new();
    for (label, amount) in [
        ("Saldo en cuentas", summary.gross),
        ("Por cobrar", summary.receivable),
        ("Por pagar", summary.payable),
        ("Saldo neto", summary.net),
    ] {
        let _ = writeln!(out, "{label:<18} {:>20}", amount.format_cop_cents());
    }
    out
}
