//! Credits, layaways, installments, and debt listings (`/apartado_credito/`).

use chrono::NaiveDate;
use joyeria_core::{
    CreditId, DebtKind, DebtStatus, InstallmentId, LayawayId, Money, PaymentMethodId, PurchaseId,
    SaleId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{id_or_object, lenient_date, lenient_text, null_as_default};
use super::parties::DebtParty;

/// Status id the API uses for a freshly opened credit or layaway.
pub const STATUS_IN_PROGRESS_ID: i64 = 4;

/// Detail record of a credit or a layaway.
///
/// Credits report their status name in `estado_detalle` and layaways in
/// `estado_nombre`; `estado` itself may be an id or a nested object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtDetail {
    pub id: i64,
    #[serde(default)]
    pub cantidad_cuotas: Option<i64>,
    #[serde(default)]
    pub cuotas_pendientes: Option<i64>,
    #[serde(default)]
    pub interes: Option<Decimal>,
    #[serde(default)]
    pub monto_total: Option<Money>,
    #[serde(default)]
    pub monto_pendiente: Option<Money>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub fecha_limite: Option<NaiveDate>,
    #[serde(default)]
    pub estado: DebtStatus,
    #[serde(default, deserialize_with = "lenient_text")]
    pub estado_detalle: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub estado_nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub descripcion: Option<String>,
}

impl DebtDetail {
    /// Resolved status, preferring the descriptive name fields.
    #[must_use]
    pub fn status(&self) -> DebtStatus {
        self.estado_detalle
            .as_deref()
            .or(self.estado_nombre.as_deref())
            .map_or_else(|| self.estado.clone(), DebtStatus::from_name)
    }
}

/// Body for opening a credit or a layaway.
///
/// Layaways carry no interest, so `interes` is omitted for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFinancing {
    pub cantidad_cuotas: i64,
    pub cuotas_pendientes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interes: Option<Decimal>,
    pub estado: i64,
    pub fecha_limite: NaiveDate,
}

impl NewFinancing {
    /// A credit with every installment still pending.
    #[must_use]
    pub const fn credit(installments: i64, interest: Decimal, deadline: NaiveDate) -> Self {
        Self {
            cantidad_cuotas: installments,
            cuotas_pendientes: installments,
            interes: Some(interest),
            estado: STATUS_IN_PROGRESS_ID,
            fecha_limite: deadline,
        }
    }

    /// A layaway with every installment still pending.
    #[must_use]
    pub const fn layaway(installments: i64, deadline: NaiveDate) -> Self {
        Self {
            cantidad_cuotas: installments,
            cuotas_pendientes: installments,
            interes: None,
            estado: STATUS_IN_PROGRESS_ID,
            fecha_limite: deadline,
        }
    }
}

/// Minimal response of a create call: only the new id is needed.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Created {
    pub id: i64,
}

/// An installment ("cuota") paid against a credit or layaway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    #[serde(default, deserialize_with = "lenient_date")]
    pub fecha: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub monto: Money,
    #[serde(default, deserialize_with = "id_or_object")]
    pub metodo_pago: Option<PaymentMethodId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub metodo_pago_nombre: Option<String>,
    #[serde(default, deserialize_with = "id_or_object")]
    pub credito: Option<CreditId>,
    #[serde(default, deserialize_with = "id_or_object")]
    pub apartado: Option<LayawayId>,
}

/// What an installment is paid against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinancingRef {
    Credit(CreditId),
    Layaway(LayawayId),
}

impl FinancingRef {
    #[must_use]
    pub const fn kind(self) -> DebtKind {
        match self {
            Self::Credit(_) => DebtKind::Credit,
            Self::Layaway(_) => DebtKind::Layaway,
        }
    }

    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Credit(id) => id.as_i64(),
            Self::Layaway(id) => id.as_i64(),
        }
    }

    #[must_use]
    pub const fn new(kind: DebtKind, id: i64) -> Self {
        match kind {
            DebtKind::Credit => Self::Credit(CreditId::new(id)),
            DebtKind::Layaway => Self::Layaway(LayawayId::new(id)),
        }
    }

    /// Query parameter used by `GET /apartado_credito/cuotas/`.
    #[must_use]
    pub const fn query_key(self) -> &'static str {
        match self {
            Self::Credit(_) => "credito",
            Self::Layaway(_) => "apartado",
        }
    }
}

/// Body for `POST /apartado_credito/cuotas/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewInstallment {
    pub monto: Decimal,
    pub fecha: NaiveDate,
    pub metodo_pago: PaymentMethodId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credito: Option<CreditId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apartado: Option<LayawayId>,
}

impl NewInstallment {
    #[must_use]
    pub const fn new(
        target: FinancingRef,
        amount: Decimal,
        date: NaiveDate,
        method: PaymentMethodId,
    ) -> Self {
        let (credito, apartado) = match target {
            FinancingRef::Credit(id) => (Some(id), None),
            FinancingRef::Layaway(id) => (None, Some(id)),
        };
        Self {
            monto: amount,
            fecha: date,
            metodo_pago: method,
            credito,
            apartado,
        }
    }
}

/// Body returned by the cancel endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelResponse {
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
}

/// A single outstanding credit or layaway as listed by the debt endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    #[serde(default, deserialize_with = "id_or_object")]
    pub venta_id: Option<SaleId>,
    #[serde(default, deserialize_with = "id_or_object")]
    pub compra_id: Option<PurchaseId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tipo: Option<String>,
    #[serde(default)]
    pub total: Option<Money>,
    #[serde(default)]
    pub cuotas_pendientes: Option<i64>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub fecha_limite: Option<NaiveDate>,
    #[serde(default)]
    pub estado: DebtStatus,
    #[serde(default, deserialize_with = "id_or_object")]
    pub credito_id: Option<CreditId>,
    #[serde(default, deserialize_with = "id_or_object")]
    pub apartado_id: Option<LayawayId>,
    #[serde(default)]
    pub monto_pendiente: Option<Money>,
    #[serde(default)]
    pub cantidad_cuotas: Option<i64>,
    #[serde(default)]
    pub interes: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub abonos: Vec<Installment>,
}

impl Debt {
    /// Financing mode, from the label or else from whichever id is present.
    #[must_use]
    pub fn kind(&self) -> DebtKind {
        self.tipo
            .as_deref()
            .and_then(DebtKind::from_label)
            .unwrap_or(if self.apartado_id.is_some() {
                DebtKind::Layaway
            } else {
                DebtKind::Credit
            })
    }

    /// The credit or layaway this debt is tracked by.
    #[must_use]
    pub fn financing(&self) -> Option<FinancingRef> {
        match self.kind() {
            DebtKind::Credit => self.credito_id.map(FinancingRef::Credit),
            DebtKind::Layaway => self.apartado_id.map(FinancingRef::Layaway),
        }
    }

    /// Pending amount, zero when the API did not report one.
    #[must_use]
    pub fn pending(&self) -> Money {
        self.monto_pendiente.unwrap_or_default()
    }
}

/// Debts grouped under the client or supplier that owes or is owed them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtGroup {
    #[serde(rename = "cliente", alias = "proveedor")]
    pub party: DebtParty,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deudas: Vec<Debt>,
}
