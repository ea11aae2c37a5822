//! Receivables and payables: flattening, filtering, and the installment
//! payment workflow.

use std::collections::HashSet;

use chrono::NaiveDate;
use joyeria_core::{ClientId, DebtKind, DebtStatus, Money, PaymentMethodId};
use rust_decimal::Decimal;
use tracing::{instrument, warn};

use crate::api::{
    ApiClient, ApiError, Debt, DebtDetail, DebtGroup, DebtParty, FinancingRef, Installment,
    NewInstallment, Sale,
};
use crate::error::ValidationError;

/// How many upcoming payments the dashboard shows per side.
pub const UPCOMING_LIMIT: usize = 5;

/// Status shown when the debt pages are opened without a filter.
pub const DEFAULT_STATUS_FILTER: &str = "En Proceso";

/// Display name of a debt's party, falling back through the legacy fields.
#[must_use]
pub fn party_display_name(party: &DebtParty) -> String {
    if let Some(name) = party.nombre.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if let Some(name) = party.razon_social.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    format!(
        "{} {}",
        party.nombres.as_deref().unwrap_or_default(),
        party.apellidos.as_deref().unwrap_or_default()
    )
    .trim()
    .to_string()
}

// =============================================================================
// Rows
// =============================================================================

/// A debt flattened together with its party, ready for a table row.
#[derive(Debug, Clone)]
pub struct DebtRow {
    pub party_id: i64,
    pub party_name: String,
    pub kind: DebtKind,
    pub financing: Option<FinancingRef>,
    /// Sale number for receivables, purchase number for payables.
    pub reference: Option<i64>,
    pub status: DebtStatus,
    pub total: Money,
    pub pending: Money,
    pub paid: Money,
    pub deadline: Option<NaiveDate>,
    pub installments: Option<i64>,
    pub remaining_installments: Option<i64>,
    pub interest: Option<Decimal>,
    pub description: Option<String>,
    pub payments: Vec<Installment>,
}

impl DebtRow {
    #[must_use]
    pub fn new(party: &DebtParty, debt: &Debt) -> Self {
        let total = debt.total.unwrap_or_default();
        let pending = debt.pending();
        Self {
            party_id: party.id,
            party_name: party_display_name(party),
            kind: debt.kind(),
            financing: debt.financing(),
            reference: debt
                .venta_id
                .map(|id| id.as_i64())
                .or_else(|| debt.compra_id.map(|id| id.as_i64())),
            status: debt.estado.clone(),
            total,
            pending,
            paid: (total - pending).max_zero(),
            deadline: debt.fecha_limite,
            installments: debt.cantidad_cuotas,
            remaining_installments: debt.cuotas_pendientes,
            interest: debt.interes,
            description: debt.descripcion.clone(),
            payments: debt.abonos.clone(),
        }
    }

    /// Suggested amount for the next installment.
    #[must_use]
    pub fn recommended_installment(&self) -> Option<Money> {
        recommended_installment(Some(self.pending), self.remaining_installments)
    }

    /// Deadline as `dd/mm/yyyy`, or a dash.
    #[must_use]
    pub fn deadline_label(&self) -> String {
        self.deadline
            .map_or_else(|| "—".to_string(), |d| d.format("%d/%m/%Y").to_string())
    }

    /// Path segment pair used by the pay and cancel routes.
    #[must_use]
    pub fn action_path(&self) -> Option<String> {
        self.financing
            .map(|f| format!("{}/{}", f.kind().path_segment(), f.id()))
    }
}

/// One party's rows, with the total still owed.
#[derive(Debug, Clone)]
pub struct PartyDebts {
    pub party_id: i64,
    pub party_name: String,
    pub document: Option<String>,
    pub rows: Vec<DebtRow>,
    pub pending_total: Money,
}

impl From<&DebtGroup> for PartyDebts {
    fn from(group: &DebtGroup) -> Self {
        let rows: Vec<DebtRow> = group
            .deudas
            .iter()
            .map(|d| DebtRow::new(&group.party, d))
            .collect();
        Self {
            party_id: group.party.id,
            party_name: party_display_name(&group.party),
            document: group.party.cedula.clone(),
            pending_total: rows.iter().map(|r| r.pending).sum(),
            rows,
        }
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Keep only debts whose status name matches, dropping parties left empty.
#[must_use]
pub fn filter_by_status(groups: Vec<DebtGroup>, status: &str) -> Vec<DebtGroup> {
    groups
        .into_iter()
        .filter_map(|mut group| {
            group.deudas.retain(|d| d.estado.matches_filter(status));
            (!group.deudas.is_empty()).then_some(group)
        })
        .collect()
}

/// Keep only groups whose party id is in `ids`.
#[must_use]
pub fn retain_parties(groups: Vec<DebtGroup>, ids: &HashSet<i64>) -> Vec<DebtGroup> {
    groups
        .into_iter()
        .filter(|g| ids.contains(&g.party.id))
        .collect()
}

/// The next in-progress debts by deadline. Debts without a deadline go last.
#[must_use]
pub fn upcoming(groups: &[DebtGroup], limit: usize) -> Vec<DebtRow> {
    let mut rows: Vec<DebtRow> = groups
        .iter()
        .flat_map(|g| g.deudas.iter().map(move |d| (g, d)))
        .filter(|(_, d)| d.estado.is_in_progress())
        .map(|(g, d)| DebtRow::new(&g.party, d))
        .collect();

    // `None` sorts after every date
    rows.sort_by_key(|r| (r.deadline.is_none(), r.deadline));
    rows.truncate(limit);
    rows
}

// =============================================================================
// Payments
// =============================================================================

/// `pending / remaining` rounded to cents; `None` when either is missing or zero.
#[must_use]
pub fn recommended_installment(pending: Option<Money>, remaining: Option<i64>) -> Option<Money> {
    let pending = pending.filter(|p| p.is_positive())?;
    let remaining = remaining.filter(|r| *r > 0)?;
    Some(Money::new(pending.amount() / Decimal::from(remaining)).round_dp(2))
}

/// A validated installment payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentInput {
    pub amount: Money,
    pub method: PaymentMethodId,
}

impl PaymentInput {
    /// Validate the raw form values.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the amount is missing, malformed, or not
    /// positive, or when no payment method was chosen.
    pub fn validate(amount: &str, method: Option<i64>) -> Result<Self, ValidationError> {
        let amount = Money::parse_input(amount)
            .filter(Money::is_positive)
            .ok_or_else(|| ValidationError::new("monto", "Ingrese un monto válido mayor a 0"))?;
        let method = method
            .filter(|id| *id > 0)
            .map(PaymentMethodId::new)
            .ok_or_else(|| ValidationError::new("metodo_pago", "Seleccione un método de pago"))?;
        Ok(Self { amount, method })
    }

    #[must_use]
    pub const fn to_api(self, target: FinancingRef, today: NaiveDate) -> NewInstallment {
        NewInstallment::new(target, self.amount.amount(), today, self.method)
    }
}

/// Best guess at a debt after a payment when the refreshed detail is unavailable.
pub fn apply_payment_locally(detail: &mut DebtDetail, amount: Money) {
    if let Some(pending) = detail.monto_pendiente {
        detail.monto_pendiente = Some((pending - amount).max_zero());
    }
    if let Some(remaining) = detail.cuotas_pendientes {
        detail.cuotas_pendientes = Some((remaining - 1).max(0));
    }
}

/// State of a debt after a payment was accepted.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub detail: DebtDetail,
    /// `false` when `detail` was derived locally.
    pub refreshed: bool,
}

/// Post an installment, then reload the debt.
///
/// `before` is the detail shown on the payment form; it is adjusted locally
/// when the reload fails.
///
/// # Errors
///
/// Returns the API's error when the payment itself is rejected.
#[instrument(skip(api, before, payment), fields(amount = %payment.amount))]
pub async fn record_payment(
    api: &ApiClient,
    target: FinancingRef,
    before: DebtDetail,
    payment: PaymentInput,
    today: NaiveDate,
) -> Result<PaymentOutcome, ApiError> {
    api.post_installment(&payment.to_api(target, today)).await?;

    match api.get_financing(target).await {
        Ok(detail) => Ok(PaymentOutcome {
            detail,
            refreshed: true,
        }),
        Err(e) => {
            warn!(error = %e, "Payment accepted but detail reload failed");
            let mut detail = before;
            apply_payment_locally(&mut detail, payment.amount);
            Ok(PaymentOutcome {
                detail,
                refreshed: false,
            })
        }
    }
}

// =============================================================================
// Rebuilding a client's debts from their sales
// =============================================================================

/// Rebuild a client's credits and layaways from their sales.
///
/// Used when receivables are searched by client: each financed sale is
/// resolved to its credit or layaway detail and installments. A detail that
/// cannot be loaded still yields a row with what the sale knows.
///
/// # Errors
///
/// Returns an error if the client's sales cannot be listed.
#[instrument(skip(api))]
pub async fn client_debts(api: &ApiClient, client: ClientId) -> Result<Vec<Debt>, ApiError> {
    let sales = api.sales_by_client(client).await?;
    let mut debts = Vec::new();
    for sale in &sales {
        if let Some(target) = sale_financing(sale) {
            debts.push(load_debt(api, sale, target).await);
        }
    }
    Ok(debts)
}

fn sale_financing(sale: &Sale) -> Option<FinancingRef> {
    sale.credito
        .map(FinancingRef::Credit)
        .or_else(|| sale.apartado.map(FinancingRef::Layaway))
}

async fn load_debt(api: &ApiClient, sale: &Sale, target: FinancingRef) -> Debt {
    let mut debt = Debt {
        venta_id: Some(sale.id),
        compra_id: None,
        tipo: Some(target.kind().label().to_string()),
        total: Some(sale.total),
        cuotas_pendientes: None,
        fecha_limite: None,
        estado: DebtStatus::Unknown,
        credito_id: None,
        apartado_id: None,
        monto_pendiente: None,
        cantidad_cuotas: None,
        interes: None,
        descripcion: None,
        abonos: Vec::new(),
    };
    match target {
        FinancingRef::Credit(id) => debt.credito_id = Some(id),
        FinancingRef::Layaway(id) => debt.apartado_id = Some(id),
    }

    match api.get_financing(target).await {
        Ok(detail) => {
            debt.estado = detail.status();
            debt.cuotas_pendientes = detail.cuotas_pendientes;
            debt.fecha_limite = detail.fecha_limite;
            debt.monto_pendiente = detail.monto_pendiente;
            debt.cantidad_cuotas = detail.cantidad_cuotas;
            debt.interes = detail.interes;
            debt.descripcion = detail.descripcion;
            debt.abonos = api.list_installments(target).await.unwrap_or_else(|e| {
                warn!(error = %e, "Could not load installments");
                Vec::new()
            });
        }
        Err(e) => warn!(error = %e, sale_id = %sale.id, "Could not load financing detail"),
    }
    debt
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use httpmock::prelude::*;
    use joyeria_core::CreditId;
    use serde_json::json;

    use super::*;
    use crate::api::client_for_tests;

    fn groups(json: &str) -> Vec<DebtGroup> {
        serde_json::from_str(json).unwrap()
    }

    const RECEIVABLES: &str = r#"[
        {"cliente": {"id": 1, "nombre": "Ana"}, "deudas": [
            {"venta_id": 10, "credito_id": 1, "estado": "En Proceso", "fecha_limite": "2025-08-01", "monto_pendiente": "100", "total": "300"},
            {"venta_id": 11, "apartado_id": 2, "estado": "Finalizado", "fecha_limite": "2025-01-01"}
        ]},
        {"cliente": {"id": 2, "nombres": "Luis", "apellidos": "Pérez"}, "deudas": [
            {"venta_id": 12, "credito_id": 3, "estado": {"id": 4, "nombre": "En Proceso"}},
            {"venta_id": 13, "credito_id": 4, "estado": "en proceso", "fecha_limite": "2025-06-15"}
        ]},
        {"cliente": {"id": 3, "razon_social": "Joyas SAS"}, "deudas": [
            {"venta_id": 14, "credito_id": 5, "estado": "Caducado"}
        ]}
    ]"#;

    #[test]
    fn test_party_display_name_fallbacks() {
        let all = groups(RECEIVABLES);
        assert_eq!(party_display_name(&all[0].party), "Ana");
        assert_eq!(party_display_name(&all[1].party), "Luis Pérez");
        assert_eq!(party_display_name(&all[2].party), "Joyas SAS");
        assert_eq!(party_display_name(&DebtParty::default()), "");
    }

    #[test]
    fn test_filter_by_status_drops_empty_parties() {
        let filtered = filter_by_status(groups(RECEIVABLES), "EN PROCESO");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].deudas.len(), 1);
        assert_eq!(filtered[1].deudas.len(), 2);

        let expired = filter_by_status(groups(RECEIVABLES), "Caducado");
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].party.id, 3);
    }

    #[test]
    fn test_upcoming_sorts_by_deadline_missing_last() {
        let rows = upcoming(&groups(RECEIVABLES), UPCOMING_LIMIT);
        let refs: Vec<_> = rows.iter().map(|r| r.reference).collect();
        assert_eq!(refs, vec![Some(13), Some(10), Some(12)]);

        let rows = upcoming(&groups(RECEIVABLES), 1);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_debt_row_paid_amount() {
        let all = groups(RECEIVABLES);
        let row = DebtRow::new(&all[0].party, &all[0].deudas[0]);
        assert_eq!(row.paid, Money::from_pesos(200));
        assert_eq!(row.action_path().as_deref(), Some("credit/1"));
    }

    #[test]
    fn test_recommended_installment() {
        assert_eq!(
            recommended_installment(Some(Money::from_pesos(100)), Some(3)),
            Some(Money::new(Decimal::from_str("33.33").unwrap()))
        );
        assert_eq!(recommended_installment(Some(Money::zero()), Some(3)), None);
        assert_eq!(recommended_installment(Some(Money::from_pesos(100)), Some(0)), None);
        assert_eq!(recommended_installment(None, Some(2)), None);
    }

    #[test]
    fn test_payment_input_validation() {
        let err = PaymentInput::validate("0", Some(1)).unwrap_err();
        assert_eq!(err.message, "Ingrese un monto válido mayor a 0");
        assert!(PaymentInput::validate("abc", Some(1)).is_err());

        let err = PaymentInput::validate("50000", None).unwrap_err();
        assert_eq!(err.field, "metodo_pago");

        let ok = PaymentInput::validate(" 50000.5 ", Some(2)).unwrap();
        assert_eq!(ok.method, PaymentMethodId::new(2));
    }

    #[test]
    fn test_apply_payment_locally_clamps_at_zero() {
        let mut detail: DebtDetail = serde_json::from_str(
            r#"{"id": 1, "monto_pendiente": "100", "cuotas_pendientes": 0}"#,
        )
        .unwrap();
        apply_payment_locally(&mut detail, Money::from_pesos(250));
        assert_eq!(detail.monto_pendiente, Some(Money::zero()));
        assert_eq!(detail.cuotas_pendientes, Some(0));

        let mut detail: DebtDetail = serde_json::from_str(
            r#"{"id": 1, "monto_pendiente": "300", "cuotas_pendientes": 3}"#,
        )
        .unwrap();
        apply_payment_locally(&mut detail, Money::from_pesos(100));
        assert_eq!(detail.monto_pendiente, Some(Money::from_pesos(200)));
        assert_eq!(detail.cuotas_pendientes, Some(2));
    }

    fn credit_before() -> DebtDetail {
        serde_json::from_value(json!({
            "id": 12, "cantidad_cuotas": 4, "cuotas_pendientes": 3,
            "monto_total": "400000", "monto_pendiente": "300000", "estado": "En Proceso"
        }))
        .unwrap()
    }

    fn payment() -> PaymentInput {
        PaymentInput::validate("50000", Some(1)).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[tokio::test]
    async fn test_record_payment_reloads_detail() {
        let server = MockServer::start();
        let post = server.mock(|when, then| {
            when.method(POST)
                .path("/api/apartado_credito/cuotas/")
                .json_body_partial(r#"{"monto": "50000", "credito": 12, "metodo_pago": 1, "fecha": "2025-07-01"}"#);
            then.status(201).json_body(json!({"id": 70, "monto": "50000", "credito": 12}));
        });
        let detail = server.mock(|when, then| {
            when.method(GET).path("/api/apartado_credito/creditos/12/");
            then.status(200).json_body(json!({
                "id": 12, "cantidad_cuotas": 4, "cuotas_pendientes": 2,
                "monto_pendiente": "250000", "estado": "En Proceso"
            }));
        });
        let api = client_for_tests(&server);
        let target = FinancingRef::Credit(CreditId::new(12));

        let outcome = record_payment(&api, target, credit_before(), payment(), today())
            .await
            .unwrap();

        post.assert();
        detail.assert();
        assert!(outcome.refreshed);
        assert_eq!(outcome.detail.monto_pendiente, Some(Money::from_pesos(250_000)));
        assert_eq!(outcome.detail.cuotas_pendientes, Some(2));
    }

    #[tokio::test]
    async fn test_record_payment_estimates_when_reload_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/apartado_credito/cuotas/");
            then.status(201).json_body(json!({"id": 70, "monto": "50000", "credito": 12}));
        });
        let detail = server.mock(|when, then| {
            when.method(GET).path("/api/apartado_credito/creditos/12/");
            then.status(500).body("boom");
        });
        let api = client_for_tests(&server);
        let target = FinancingRef::Credit(CreditId::new(12));

        let outcome = record_payment(&api, target, credit_before(), payment(), today())
            .await
            .unwrap();

        detail.assert();
        assert!(!outcome.refreshed);
        assert_eq!(outcome.detail.monto_pendiente, Some(Money::from_pesos(250_000)));
        assert_eq!(outcome.detail.cuotas_pendientes, Some(2));
        assert_eq!(outcome.detail.monto_total, Some(Money::from_pesos(400_000)));
    }

    #[tokio::test]
    async fn test_record_payment_rejected_skips_reload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/apartado_credito/cuotas/");
            then.status(400)
                .json_body(json!({"monto": ["El monto excede el saldo pendiente"]}));
        });
        let detail = server.mock(|when, then| {
            when.method(GET).path("/api/apartado_credito/creditos/12/");
            then.status(200).json_body(json!({"id": 12}));
        });
        let api = client_for_tests(&server);
        let target = FinancingRef::Credit(CreditId::new(12));

        let result = record_payment(&api, target, credit_before(), payment(), today()).await;

        assert!(result.is_err());
        detail.assert_hits(0);
    }
}
