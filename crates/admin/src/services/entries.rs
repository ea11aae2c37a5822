//! Expense and income entry forms.

use joyeria_core::{Money, PaymentMethodId};
use serde::Deserialize;

use crate::api::{Entry, NewEntry};
use crate::error::ValidationError;

/// Entries listed under the form.
pub const RECENT_LIMIT: usize = 10;

/// Which register entry a form records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Expense => "Registrar egreso",
            Self::Income => "Registrar ingreso",
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Expense => "/expenses",
            Self::Income => "/incomes",
        }
    }

    /// Notice code shown after a successful submit.
    #[must_use]
    pub const fn notice(self) -> &'static str {
        match self {
            Self::Expense => "expense_created",
            Self::Income => "income_created",
        }
    }
}

/// Raw entry form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub monto: String,
    #[serde(default)]
    pub metodo_pago: String,
    #[serde(default)]
    pub descripcion: String,
}

impl EntryForm {
    /// # Errors
    ///
    /// The amount must be a positive number and a payment method chosen.
    pub fn validate(&self) -> Result<NewEntry, ValidationError> {
        let amount = Money::parse_input(&self.monto)
            .filter(Money::is_positive)
            .ok_or_else(|| ValidationError::new("monto", "Ingrese un monto válido"))?;
        let method = self
            .metodo_pago
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(PaymentMethodId::new)
            .ok_or_else(|| ValidationError::new("metodo_pago", "Seleccione un método de pago"))?;
        Ok(NewEntry {
            monto: amount.amount(),
            metodo_pago: method,
            descripcion: self.descripcion.trim().to_string(),
        })
    }
}

/// Newest entries first, at most [`RECENT_LIMIT`].
#[must_use]
pub fn recent(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by(|a, b| b.fecha_registro.cmp(&a.fecha_registro));
    entries.truncate(RECENT_LIMIT);
    entries
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_entry_form_validation() {
        let form = EntryForm {
            monto: "0".to_string(),
            metodo_pago: "1".to_string(),
            ..EntryForm::default()
        };
        assert_eq!(form.validate().unwrap_err().message, "Ingrese un monto válido");

        let form = EntryForm {
            monto: "50000".to_string(),
            ..EntryForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err().message,
            "Seleccione un método de pago"
        );

        let form = EntryForm {
            monto: " 50000.5 ".to_string(),
            metodo_pago: "2".to_string(),
            descripcion: " Arriendo ".to_string(),
        };
        let entry = form.validate().unwrap();
        assert_eq!(entry.monto, Decimal::new(500_005, 1));
        assert_eq!(entry.descripcion, "Arriendo");
    }

    #[test]
    fn test_recent_orders_newest_first() {
        let entries: Vec<Entry> = serde_json::from_value(serde_json::json!([
            {"id": 1, "monto": "1", "fecha_registro": "2025-03-01T10:00:00"},
            {"id": 2, "monto": "1", "fecha_registro": "2025-03-03T10:00:00"},
            {"id": 3, "monto": "1", "fecha": "2025-03-02T10:00:00"}
        ]))
        .unwrap();
        let ids: Vec<i64> = recent(entries).iter().map(|e| e.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
