//! Receivables and payables route handlers.
//!
//! Both sides share the same pages; payables only carry credits.

use std::collections::HashSet;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use joyeria_core::{DebtKind, DebtStatus, Money};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    api::{ApiClient, ApiError, DebtDetail, DebtGroup, DebtParty, FinancingRef, Installment, PaymentMethod},
    components::{Notice, NoticeQuery},
    error::AppError,
    filters,
    services::debts::{
        self, DEFAULT_STATUS_FILTER, PartyDebts, PaymentInput, PaymentOutcome,
        recommended_installment,
    },
    state::AppState,
};

use super::{PageResult, render, with_query};

/// Status selector value that shows every status.
pub const ALL_STATUSES: &str = "Todos";

const LOAD_ERROR: &str = "No se pudieron cargar las deudas";
const DETAIL_ERROR: &str = "No se pudo cargar el detalle de la deuda";
const PAYMENT_RECORDED: &str = "Abono registrado correctamente";
const ESTIMATED_NOTE: &str =
    "El abono fue registrado, pero no se pudo actualizar el detalle. Los valores mostrados son estimados.";

/// Which side of the ledger a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Owed to the store by clients.
    Receivable,
    /// Owed by the store to suppliers.
    Payable,
}

impl Side {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Receivable => "/receivables",
            Self::Payable => "/payables",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Receivable => "Deudas por cobrar",
            Self::Payable => "Deudas por pagar",
        }
    }

    #[must_use]
    pub const fn party_label(self) -> &'static str {
        match self {
            Self::Receivable => "Cliente",
            Self::Payable => "Proveedor",
        }
    }

    #[must_use]
    pub const fn reference_label(self) -> &'static str {
        match self {
            Self::Receivable => "Venta",
            Self::Payable => "Compra",
        }
    }

    const fn allows(self, kind: DebtKind) -> bool {
        matches!(self, Self::Receivable) || matches!(kind, DebtKind::Credit)
    }

    async fn load(self, api: &ApiClient) -> Result<Vec<DebtGroup>, ApiError> {
        match self {
            Self::Receivable => api.receivables().await,
            Self::Payable => api.payables().await,
        }
    }

    /// Groups whose party matches `term`.
    ///
    /// Receivables are rebuilt from each matching client's sales; payables
    /// are the full list narrowed to the matching suppliers.
    async fn search(self, api: &ApiClient, term: &str) -> Result<Vec<DebtGroup>, ApiError> {
        match self {
            Self::Receivable => {
                let clients = api.search_clients(term).await?;
                let mut groups = Vec::new();
                for client in &clients {
                    match debts::client_debts(api, client.id).await {
                        Ok(deudas) if !deudas.is_empty() => groups.push(DebtGroup {
                            party: DebtParty::from(client),
                            deudas,
                        }),
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(client_id = %client.id, error = %e, "Failed to load client debts");
                        }
                    }
                }
                Ok(groups)
            }
            Self::Payable => {
                let suppliers = api.search_suppliers(term).await?;
                let ids: HashSet<i64> = suppliers.iter().map(|s| s.id.as_i64()).collect();
                Ok(debts::retain_parties(api.payables().await?, &ids))
            }
        }
    }
}

// =============================================================================
// Listing
// =============================================================================

/// List query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DebtsQuery {
    pub status: Option<String>,
    #[serde(default)]
    pub q: String,
}

impl DebtsQuery {
    fn status(&self) -> &str {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STATUS_FILTER)
    }
}

/// Narrow groups to the chosen status and, for payables, to credits.
fn narrow(side: Side, groups: Vec<DebtGroup>, status: &str) -> Vec<DebtGroup> {
    let groups = if status == ALL_STATUSES {
        groups
    } else {
        debts::filter_by_status(groups, status)
    };
    groups
        .into_iter()
        .filter_map(|mut group| {
            group.deudas.retain(|d| side.allows(d.kind()));
            (!group.deudas.is_empty()).then_some(group)
        })
        .collect()
}

/// Debts list template.
#[derive(Template)]
#[template(path = "debts/index.html")]
pub struct DebtsIndexTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub side: Side,
    pub parties: Vec<PartyDebts>,
    pub status: String,
    pub status_options: Vec<&'static str>,
    pub search_query: String,
    pub pending_total: Money,
}

async fn index(side: Side, state: &AppState, query: DebtsQuery, notice: &NoticeQuery) -> PageResult {
    let term = query.q.trim();
    let result = if term.is_empty() {
        side.load(state.api()).await
    } else {
        side.search(state.api(), term).await
    };

    let status = query.status().to_string();
    let (parties, error) = match result {
        Ok(groups) => (
            narrow(side, groups, &status)
                .iter()
                .map(PartyDebts::from)
                .collect::<Vec<_>>(),
            None,
        ),
        Err(e) => {
            tracing::error!(side = ?side, error = %e, "Failed to fetch debts");
            (Vec::new(), Some(LOAD_ERROR.to_string()))
        }
    };

    let mut status_options = vec![ALL_STATUSES];
    status_options.extend(DebtStatus::FILTERS);

    render(&DebtsIndexTemplate {
        current_path: side.path().to_string(),
        notice: notice.resolve(),
        error,
        side,
        pending_total: parties.iter().map(|p| p.pending_total).sum(),
        parties,
        status,
        status_options,
        search_query: query.q,
    })
}

/// Receivables list handler.
#[instrument(skip(state))]
pub async fn receivables(
    State(state): State<AppState>,
    Query(query): Query<DebtsQuery>,
    Query(notice): Query<NoticeQuery>,
) -> PageResult {
    index(Side::Receivable, &state, query, &notice).await
}

/// Payables list handler.
#[instrument(skip(state))]
pub async fn payables(
    State(state): State<AppState>,
    Query(query): Query<DebtsQuery>,
    Query(notice): Query<NoticeQuery>,
) -> PageResult {
    index(Side::Payable, &state, query, &notice).await
}

// =============================================================================
// Installment payments
// =============================================================================

/// Raw payment form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentForm {
    #[serde(default)]
    pub monto: String,
    #[serde(default)]
    pub metodo_pago: String,
}

impl PaymentForm {
    fn method(&self) -> Option<i64> {
        self.metodo_pago.trim().parse().ok()
    }
}

/// Payment page template.
#[derive(Template)]
#[template(path = "debts/pay.html")]
pub struct PayTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub side: Side,
    pub kind: DebtKind,
    pub base_path: String,
    pub detail: Option<DebtDetail>,
    pub status: DebtStatus,
    pub recommended: Option<Money>,
    pub payments: Vec<Installment>,
    pub methods: Vec<PaymentMethod>,
    pub form: PaymentForm,
    /// Set when the detail shown was adjusted locally.
    pub estimate_note: Option<String>,
}

fn resolve_target(side: Side, kind: &str, id: i64) -> Result<FinancingRef, AppError> {
    DebtKind::from_path_segment(kind)
        .filter(|k| side.allows(*k))
        .map(|k| FinancingRef::new(k, id))
        .ok_or_else(|| AppError::NotFound(format!("{kind}/{id}")))
}

struct PayPage {
    side: Side,
    target: FinancingRef,
    detail: Option<DebtDetail>,
    payments: Vec<Installment>,
    methods: Vec<PaymentMethod>,
}

impl PayPage {
    async fn load(state: &AppState, side: Side, target: FinancingRef) -> (Self, Option<String>) {
        let api = state.api();
        let (detail, payments, methods) = tokio::join!(
            api.get_financing(target),
            api.list_installments(target),
            api.payment_methods()
        );
        let mut error = None;
        let detail = detail
            .map_err(|e| {
                tracing::error!(target = ?target, error = %e, "Failed to fetch debt detail");
                error = Some(DETAIL_ERROR.to_string());
            })
            .ok();
        let payments = payments.unwrap_or_else(|e| {
            tracing::warn!(target = ?target, error = %e, "Failed to fetch installments");
            Vec::new()
        });
        let methods = methods.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to fetch payment methods");
            Vec::new()
        });
        (
            Self {
                side,
                target,
                detail,
                payments,
                methods,
            },
            error,
        )
    }

    fn render(
        self,
        form: PaymentForm,
        notice: Option<Notice>,
        error: Option<String>,
        estimate_note: Option<String>,
    ) -> PageResult {
        let recommended = self
            .detail
            .as_ref()
            .and_then(|d| recommended_installment(d.monto_pendiente, d.cuotas_pendientes));
        render(&PayTemplate {
            current_path: self.side.path().to_string(),
            notice,
            error,
            side: self.side,
            kind: self.target.kind(),
            base_path: format!(
                "{}/{}/{}",
                self.side.path(),
                self.target.kind().path_segment(),
                self.target.id()
            ),
            status: self
                .detail
                .as_ref()
                .map_or(DebtStatus::Unknown, DebtDetail::status),
            detail: self.detail,
            recommended,
            payments: self.payments,
            methods: self.methods,
            form,
            estimate_note,
        })
    }
}

async fn pay_form(state: &AppState, side: Side, kind: &str, id: i64) -> Result<Response, AppError> {
    let target = resolve_target(side, kind, id)?;
    let (page, error) = PayPage::load(state, side, target).await;
    let form = PaymentForm {
        monto: page
            .detail
            .as_ref()
            .and_then(|d| recommended_installment(d.monto_pendiente, d.cuotas_pendientes))
            .map(|m| m.amount().to_string())
            .unwrap_or_default(),
        ..PaymentForm::default()
    };
    Ok(page.render(form, None, error, None)?.into_response())
}

async fn pay(
    state: &AppState,
    side: Side,
    kind: &str,
    id: i64,
    form: PaymentForm,
) -> Result<Response, AppError> {
    let target = resolve_target(side, kind, id)?;

    let payment = match PaymentInput::validate(&form.monto, form.method()) {
        Ok(payment) => payment,
        Err(e) => {
            let (page, _) = PayPage::load(state, side, target).await;
            return Ok(page.render(form, None, Some(e.message), None)?.into_response());
        }
    };

    let before = match state.api().get_financing(target).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::error!(target = ?target, error = %e, "Failed to fetch debt before payment");
            let (page, _) = PayPage::load(state, side, target).await;
            return Ok(page
                .render(form, None, Some(DETAIL_ERROR.to_string()), None)?
                .into_response());
        }
    };

    let today = chrono::Local::now().date_naive();
    match debts::record_payment(state.api(), target, before, payment, today).await {
        Ok(PaymentOutcome { detail, refreshed }) => {
            tracing::info!(target = ?target, amount = %payment.amount, refreshed, "Installment recorded");
            let (mut page, _) = PayPage::load(state, side, target).await;
            page.detail = Some(detail);
            let note = (!refreshed).then(|| ESTIMATED_NOTE.to_string());
            Ok(page
                .render(
                    PaymentForm::default(),
                    Some(Notice::success(PAYMENT_RECORDED)),
                    None,
                    note,
                )?
                .into_response())
        }
        Err(e) => {
            tracing::error!(target = ?target, error = %e, "Failed to record installment");
            let (page, _) = PayPage::load(state, side, target).await;
            Ok(page
                .render(form, None, Some(e.user_message()), None)?
                .into_response())
        }
    }
}

/// Receivable payment form handler.
#[instrument(skip(state))]
pub async fn receivable_pay_form(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Response, AppError> {
    pay_form(&state, Side::Receivable, &kind, id).await
}

/// Receivable payment handler.
#[instrument(skip(state, form))]
pub async fn receivable_pay(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Form(form): Form<PaymentForm>,
) -> Result<Response, AppError> {
    pay(&state, Side::Receivable, &kind, id, form).await
}

/// Payable payment form handler.
#[instrument(skip(state))]
pub async fn payable_pay_form(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Response, AppError> {
    pay_form(&state, Side::Payable, &kind, id).await
}

/// Payable payment handler.
#[instrument(skip(state, form))]
pub async fn payable_pay(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Form(form): Form<PaymentForm>,
) -> Result<Response, AppError> {
    pay(&state, Side::Payable, &kind, id, form).await
}

// =============================================================================
// Cancelling
// =============================================================================

/// Cancel form: the checkbox must be ticked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelForm {
    pub confirm: Option<String>,
}

async fn cancel(
    state: &AppState,
    side: Side,
    kind: &str,
    id: i64,
    form: &CancelForm,
) -> Result<Redirect, AppError> {
    let target = resolve_target(side, kind, id)?;
    if form.confirm.is_none() {
        let back = format!("{}/{}/{}/pay", side.path(), kind, id);
        return Ok(Redirect::to(&with_query(&back, &[("notice", "cancel_unconfirmed")])));
    }

    match state.api().cancel_financing(target).await {
        Ok(response) => {
            tracing::info!(target = ?target, message = ?response.message, "Debt cancelled");
            Ok(Redirect::to(&with_query(side.path(), &[("notice", "debt_cancelled")])))
        }
        Err(e) => {
            tracing::error!(target = ?target, error = %e, "Failed to cancel debt");
            Ok(Redirect::to(&with_query(side.path(), &[("notice", "cancel_failed")])))
        }
    }
}

/// Receivable cancel handler.
#[instrument(skip(state))]
pub async fn receivable_cancel(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Form(form): Form<CancelForm>,
) -> Result<Redirect, AppError> {
    cancel(&state, Side::Receivable, &kind, id, &form).await
}

/// Payable cancel handler.
#[instrument(skip(state))]
pub async fn payable_cancel(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Form(form): Form<CancelForm>,
) -> Result<Redirect, AppError> {
    cancel(&state, Side::Payable, &kind, id, &form).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/receivables", get(receivables))
        .route(
            "/receivables/{kind}/{id}/pay",
            get(receivable_pay_form).post(receivable_pay),
        )
        .route("/receivables/{kind}/{id}/cancel", post(receivable_cancel))
        .route("/payables", get(payables))
        .route(
            "/payables/{kind}/{id}/pay",
            get(payable_pay_form).post(payable_pay),
        )
        .route("/payables/{kind}/{id}/cancel", post(payable_cancel))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn groups() -> Vec<DebtGroup> {
        serde_json::from_value(serde_json::json!([
            {"proveedor": {"id": 7, "nombre": "Oro SAS"}, "deudas": [
                {"compra_id": 1, "credito_id": 2, "estado": "En Proceso"},
                {"compra_id": 2, "apartado_id": 3, "estado": "En Proceso"},
                {"compra_id": 3, "credito_id": 4, "estado": "Finalizado"}
            ]}
        ]))
        .unwrap()
    }

    #[test]
    fn test_payables_keep_credits_only() {
        let narrowed = narrow(Side::Payable, groups(), ALL_STATUSES);
        assert_eq!(narrowed[0].deudas.len(), 2);
        assert!(narrowed[0].deudas.iter().all(|d| d.kind() == DebtKind::Credit));

        let narrowed = narrow(Side::Payable, groups(), DEFAULT_STATUS_FILTER);
        assert_eq!(narrowed[0].deudas.len(), 1);
    }

    #[test]
    fn test_receivables_keep_layaways() {
        let narrowed = narrow(Side::Receivable, groups(), "En Proceso");
        assert_eq!(narrowed[0].deudas.len(), 2);
        assert!(narrow(Side::Receivable, groups(), "Caducado").is_empty());
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target(Side::Receivable, "layaway", 3).ok(),
            Some(FinancingRef::new(DebtKind::Layaway, 3))
        );
        assert!(resolve_target(Side::Payable, "layaway", 3).is_err());
        assert!(resolve_target(Side::Receivable, "loan", 3).is_err());
    }

    #[test]
    fn test_status_defaults_to_in_progress() {
        assert_eq!(DebtsQuery::default().status(), "En Proceso");
        let query = DebtsQuery {
            status: Some("Todos".to_string()),
            q: String::new(),
        };
        assert_eq!(query.status(), ALL_STATUSES);
    }
}
