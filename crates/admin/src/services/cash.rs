//! Cash register derivations: summary totals, movement grouping, closures.

use std::sync::LazyLock;

use chrono::NaiveDate;
use joyeria_core::{ClosureKind, Money, MovementDirection};
use regex::Regex;

use crate::api::{Account, CloseRegister, DebtGroup, Movement};
use crate::error::ValidationError;

/// Placeholder for values that cannot be recovered from a description.
pub const MISSING: &str = "—";

const CLOSE_OBSERVATION: &str = "Cierre manual desde el panel";
const CLOSED_BY: &str = "Usuario";

static SALE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Venta #(\d+)").expect("Invalid regex"));
static PURCHASE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Compra #(\d+)").expect("Invalid regex"));

// =============================================================================
// Summary
// =============================================================================

/// Money position across accounts and open debts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CashSummary {
    /// Sum of every account balance.
    pub gross: Money,
    /// Owed to the store by clients.
    pub receivable: Money,
    /// Owed by the store to suppliers.
    pub payable: Money,
    /// `gross + receivable - payable`.
    pub net: Money,
}

impl CashSummary {
    #[must_use]
    pub fn compute(accounts: &[Account], receivables: &[DebtGroup], payables: &[DebtGroup]) -> Self {
        let gross = accounts.iter().map(|a| a.saldo_actual).sum();
        let receivable = pending_total(receivables);
        let payable = pending_total(payables);
        Self {
            gross,
            receivable,
            payable,
            net: gross + receivable - payable,
        }
    }
}

fn pending_total(groups: &[DebtGroup]) -> Money {
    groups
        .iter()
        .flat_map(|g| &g.deudas)
        .map(crate::api::Debt::pending)
        .sum()
}

// =============================================================================
// Movement groups
// =============================================================================

/// Open movements split by origin, each group in API order.
#[derive(Debug, Clone, Default)]
pub struct MovementGroups {
    pub sales: Vec<Movement>,
    pub purchases: Vec<Movement>,
    pub installments_in: Vec<Movement>,
    pub installments_out: Vec<Movement>,
    pub expenses: Vec<Movement>,
    pub incomes: Vec<Movement>,
}

impl MovementGroups {
    /// Split movements by what produced them.
    ///
    /// A movement lands in the first group it qualifies for. Installments
    /// without a direction are dropped.
    #[must_use]
    pub fn split(movements: Vec<Movement>) -> Self {
        let mut groups = Self::default();
        for movement in movements {
            if movement.venta_info.is_some() {
                groups.sales.push(movement);
            } else if movement.compra_info.is_some() {
                groups.purchases.push(movement);
            } else if movement.cuota_info.is_some() {
                match movement.direction() {
                    Some(MovementDirection::Inflow) => groups.installments_in.push(movement),
                    Some(MovementDirection::Outflow) => groups.installments_out.push(movement),
                    None => {}
                }
            } else if movement.egreso_info.is_some() {
                groups.expenses.push(movement);
            } else if movement.ingreso_info.is_some() {
                groups.incomes.push(movement);
            }
        }
        groups
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
            && self.purchases.is_empty()
            && self.installments_in.is_empty()
            && self.installments_out.is_empty()
            && self.expenses.is_empty()
            && self.incomes.is_empty()
    }
}

// =============================================================================
// Descriptions
// =============================================================================

/// Which side an installment movement was paid on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallmentSide {
    /// Paid by a client against a sale.
    Client,
    /// Paid to a supplier against a purchase.
    Supplier,
}

impl InstallmentSide {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Client => "Abono de cliente ",
            Self::Supplier => "Abono a proveedor ",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Client => &SALE_REF,
            Self::Supplier => &PURCHASE_REF,
        }
    }
}

/// Sale or purchase number and party name recovered from an installment
/// movement's description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentDescription {
    pub reference: String,
    pub party: String,
}

/// Parse descriptions like `"Abono de cliente Ana Torres - Venta #40"`.
#[must_use]
pub fn parse_installment_description(
    description: &str,
    side: InstallmentSide,
) -> InstallmentDescription {
    let reference = side
        .pattern()
        .captures(description)
        .and_then(|c| c.get(1))
        .map_or_else(|| MISSING.to_string(), |m| m.as_str().to_string());

    let head = description.split(" - ").next().unwrap_or_default();
    let party = head.replacen(side.prefix(), "", 1).trim().to_string();

    InstallmentDescription {
        reference,
        party: if party.is_empty() {
            MISSING.to_string()
        } else {
            party
        },
    }
}

/// The party of a sale or purchase movement: the text after the first `" - "`.
#[must_use]
pub fn counterparty_from_description(description: &str) -> String {
    description
        .split(" - ")
        .nth(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

// =============================================================================
// Closing the register
// =============================================================================

/// A validated request to close the register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CloseRequest {
    /// Validate the closing period.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the end date is missing or falls
    /// before the start date.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, ValidationError> {
        let end = end.ok_or_else(|| {
            ValidationError::new(
                "fecha_fin",
                "Debe seleccionar una fecha de fin para cerrar la caja",
            )
        })?;
        if end < start {
            return Err(ValidationError::new(
                "fecha_fin",
                "La fecha de fin no puede ser anterior a la fecha de inicio",
            ));
        }
        Ok(Self { start, end })
    }

    /// Daily closure covering whole days from `start` to `end`.
    #[must_use]
    pub fn to_api(&self) -> CloseRegister {
        CloseRegister {
            tipo_cierre: ClosureKind::Daily,
            fecha_inicio: format!("{}T00:00:00", self.start.format("%Y-%m-%d")),
            fecha_fin: format!("{}T23:59:59", self.end.format("%Y-%m-%d")),
            observaciones: CLOSE_OBSERVATION.to_string(),
            cerrado_por: CLOSED_BY.to_string(),
        }
    }
}
