//! Expense and income entries (`/egreso_ingreso/`).

use joyeria_core::{EntryId, Money, PaymentMethodId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{id_or_object, lenient_text, null_as_default};

/// A recorded expense ("egreso") or income ("ingreso").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub monto: Money,
    #[serde(default, deserialize_with = "id_or_object")]
    pub metodo_pago: Option<PaymentMethodId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub descripcion: Option<String>,
    #[serde(default, alias = "fecha", deserialize_with = "lenient_text")]
    pub fecha_registro: Option<String>,
}

/// Body for creating an expense or an income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEntry {
    pub monto: Decimal,
    pub metodo_pago: PaymentMethodId,
    pub descripcion: String,
}
