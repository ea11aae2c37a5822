//! Debt reports.

use std::fmt::Write;

use joyeria_admin::api::{ApiClient, DebtGroup};
use joyeria_admin::services::debts::{
    DebtRow, PartyDebts, UPCOMING_LIMIT, filter_by_status, upcoming as next_due,
};
use joyeria_core::Money;

use super::{CliError, emit};

/// Status value that keeps every debt.
const ALL_STATUSES: &str = "Todos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Receivable,
    Payable,
}

impl Side {
    const fn title(self) -> &'static str {
        match self {
            Self::Receivable => "Deudas por cobrar",
            Self::Payable => "Deudas por pagar",
        }
    }
}

/// Print one side's debts grouped by party.
///
/// # Errors
///
/// Returns an error if the debt listing cannot be loaded.
pub async fn list(api: &ApiClient, side: Side, status: &str) -> Result<(), CliError> {
    let groups = match side {
        Side::Receivable => api.receivables().await?,
        Side::Payable => api.payables().await?,
    };
    let groups = if status.trim().eq_ignore_ascii_case(ALL_STATUSES) {
        groups
    } else {
        filter_by_status(groups, status)
    };
    emit(&render_groups(side, &groups));
    Ok(())
}

/// Print the next receivable and payable payments.
///
/// # Errors
///
/// Returns an error if either listing cannot be loaded.
pub async fn upcoming(api: &ApiClient) -> Result<(), CliError> {
    let (receivables, payables) = tokio::join!(api.receivables(), api.payables());
    let mut out = String::new();
    out.push_str(&render_upcoming("Próximos cobros", &next_due(&receivables?, UPCOMING_LIMIT)));
    out.push('\n');
    out.push_str(&render_upcoming("Próximos pagos", &next_due(&payables?, UPCOMING_LIMIT)));
    emit(&out);
    Ok(())
}

fn row_line(out: &mut String, row: &DebtRow) {
    let reference = row.reference.map_or_else(|| "—".to_string(), |r| format!("#{r}"));
    let _ = writeln!(
        out,
        "  {reference:<8} {:<9} {:<11} {:>16} {:>16}  {}",
        row.kind.label(),
        row.status.label(),
        row.total.format_cop(),
        row.pending.format_cop(),
        row.deadline_label(),
    );
}

fn render_groups(side: Side, groups: &[DebtGroup]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", side.title());
    if groups.is_empty() {
        out.push_str("  Sin deudas para mostrar\n");
        return out;
    }

    let parties: Vec<PartyDebts> = groups.iter().map(PartyDebts::from).collect();
    for party in &parties {
        let _ = writeln!(
            out,
            "\n{} (pendiente {})",
            party.party_name,
            party.pending_total.format_cop()
        );
        for row in &party.rows {
            row_line(&mut out, row);
        }
    }
    let total: Money = parties.iter().map(|p| p.pending_total).sum();
    let _ = writeln!(out, "\nTotal pendiente: {}", total.format_cop_cents());
    out
}

fn render_upcoming(title: &str, rows: &[DebtRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    if rows.is_empty() {
        out.push_str("  Nada pendiente\n");
    }
    for row in rows {
        let _ = writeln!(
            out,
            "  {:<12} {:<30} {:>16}",
            row.deadline_label(),
            row.party_name,
            row.pending.format_cop()
        );
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn groups() -> Vec<DebtGroup> {
        serde_json::from_value(serde_json::json!([
            {"cliente": {"id": 1, "nombre": "Ana Torres"}, "deudas": [
                {"venta_id": 40, "tipo": "Crédito", "total": "500000", "monto_pendiente": "250000",
                 "fecha_limite": "2025-07-01", "estado": "En Proceso", "credito_id": 12},
                {"venta_id": 41, "tipo": "Apartado", "total": "80000", "monto_pendiente": "0",
                 "estado": "Finalizado", "apartado_id": 3}
            ]},
            {"cliente": {"id": 2, "nombre": "Luis"}, "deudas": [
                {"venta_id": 50, "tipo": "Crédito", "total": "90000", "monto_pendiente": "90000",
                 "fecha_limite": "2025-06-15", "estado": "En Proceso", "credito_id": 13}
            ]}
        ]))
        .unwrap()
    }

    #[test]
    fn test_render_groups_lists_each_party() {
        let report = render_groups(Side::Receivable, &groups());
        assert!(report.starts_with("Deudas por cobrar"));
        assert!(report.contains("Ana Torres (pendiente $250.000)"));
        assert!(report.contains("#40"));
        assert!(report.contains("01/07/2025"));
        assert!(report.contains("Total pendiente: $340.000,00"));
    }

    #[test]
    fn test_render_groups_empty() {
        let report = render_groups(Side::Payable, &[]);
        assert_eq!(report, "Deudas por pagar\n  Sin deudas para mostrar\n");
    }

    #[test]
    fn test_render_upcoming_orders_by_deadline() {
        let rows = next_due(&groups(), UPCOMING_LIMIT);
        let report = render_upcoming("Próximos cobros", &rows);
        let luis = report.find("Luis").unwrap();
        let ana = report.find("Ana Torres").unwrap();
        assert!(luis < ana);
        assert_eq!(report.lines().count(), 3);
    }
}
