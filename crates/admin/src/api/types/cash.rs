//! Cash register: accounts, movements, and closures (`/caja/`).

use joyeria_core::{
    AccountId, ClosureId, ClosureKind, Money, MovementDirection, MovementId, PurchaseId, SaleId,
};
use serde::{Deserialize, Serialize};

use super::common::{lenient_text, null_as_default};

/// A money account (cash drawer, bank, wallet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub saldo_actual: Money,
    #[serde(default = "default_true")]
    pub activa: bool,
}

const fn default_true() -> bool {
    true
}

/// The account a movement touched, nested or by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountRef {
    Nested {
        id: AccountId,
        #[serde(default, deserialize_with = "null_as_default")]
        nombre: String,
    },
    Id(AccountId),
}

impl AccountRef {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Nested { nombre, .. } => nombre,
            Self::Id(_) => "",
        }
    }
}

/// Movement category as configured in the register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementType {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
    #[serde(default)]
    pub tipo: Option<MovementDirection>,
}

/// The sale or purchase a movement came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRef<Id> {
    pub id: Id,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: Money,
}

/// The installment a movement came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentRef {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub monto: Money,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha: Option<String>,
}

/// The expense or income entry a movement came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRef {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub monto: Money,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha: Option<String>,
}

/// A cash movement with its origin attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    #[serde(default)]
    pub cuenta: Option<AccountRef>,
    #[serde(default)]
    pub tipo_movimiento: Option<MovementType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub monto: Money,
    #[serde(default, deserialize_with = "lenient_text")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha: Option<String>,
    #[serde(default)]
    pub venta_info: Option<TradeRef<SaleId>>,
    #[serde(default)]
    pub compra_info: Option<TradeRef<PurchaseId>>,
    #[serde(default)]
    pub cuota_info: Option<InstallmentRef>,
    #[serde(default)]
    pub egreso_info: Option<EntryRef>,
    #[serde(default)]
    pub ingreso_info: Option<EntryRef>,
    #[serde(default)]
    pub cierre_caja: Option<ClosureId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub observaciones: Option<String>,
}

impl Movement {
    #[must_use]
    pub fn direction(&self) -> Option<MovementDirection> {
        self.tipo_movimiento.as_ref().and_then(|t| t.tipo)
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        self.tipo_movimiento.as_ref().map_or("", |t| t.nombre.as_str())
    }

    #[must_use]
    pub fn account_name(&self) -> &str {
        self.cuenta.as_ref().map_or("", AccountRef::name)
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.descripcion.as_deref().unwrap_or("")
    }
}

/// A closed register period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Closure {
    pub id: ClosureId,
    #[serde(default)]
    pub tipo_cierre: ClosureKind,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha_inicio: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha_fin: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha_cierre: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_entradas: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_salidas: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub saldo_inicial: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub saldo_final: Money,
    #[serde(default, deserialize_with = "lenient_text")]
    pub observaciones: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cerrado_por: Option<String>,
}

impl Closure {
    /// Inflows minus outflows for the period.
    #[must_use]
    pub fn profit(&self) -> Money {
        self.total_entradas - self.total_salidas
    }
}

/// Body for `POST /caja/cierres/realizar_cierre/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseRegister {
    pub tipo_cierre: ClosureKind,
    pub fecha_inicio: String,
    pub fecha_fin: String,
    pub observaciones: String,
    pub cerrado_por: String,
}
