//! Cash register route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use chrono::NaiveDate;
use joyeria_core::{Money, MovementDirection, MovementId};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    api::{Account, Closure, Movement, Purchase, Sale},
    components::{Notice, NoticeQuery},
    filters,
    services::cash::{
        CashSummary, CloseRequest, InstallmentSide, MISSING, MovementGroups,
        counterparty_from_description, parse_installment_description,
    },
    state::AppState,
};

use super::{PageResult, render};

const LOAD_ERROR: &str = "No se pudieron cargar los datos de caja";

/// Closures listed under the close form.
const RECENT_CLOSURES: usize = 5;

// =============================================================================
// Views
// =============================================================================

/// One movement as a table row.
#[derive(Debug, Clone)]
pub struct MovementRow {
    pub id: MovementId,
    pub date: String,
    pub amount: Money,
    pub account: String,
    /// Sale or purchase number, `—` when not applicable.
    pub reference: String,
    pub party: String,
    pub description: String,
}

impl MovementRow {
    fn base(movement: &Movement) -> Self {
        Self {
            id: movement.id,
            date: movement.fecha.clone().unwrap_or_default(),
            amount: movement.monto,
            account: movement.account_name().to_string(),
            reference: MISSING.to_string(),
            party: MISSING.to_string(),
            description: movement.description().to_string(),
        }
    }

    fn sale(movement: &Movement) -> Self {
        Self {
            reference: movement
                .venta_info
                .as_ref()
                .map_or_else(|| MISSING.to_string(), |v| v.id.to_string()),
            party: counterparty_from_description(movement.description()),
            ..Self::base(movement)
        }
    }

    fn purchase(movement: &Movement) -> Self {
        Self {
            reference: movement
                .compra_info
                .as_ref()
                .map_or_else(|| MISSING.to_string(), |c| c.id.to_string()),
            party: counterparty_from_description(movement.description()),
            ..Self::base(movement)
        }
    }

    fn installment(movement: &Movement, side: InstallmentSide) -> Self {
        let parsed = parse_installment_description(movement.description(), side);
        Self {
            reference: parsed.reference,
            party: parsed.party,
            ..Self::base(movement)
        }
    }
}

/// A titled group of movements.
#[derive(Debug, Clone)]
pub struct MovementSection {
    pub title: &'static str,
    pub reference_label: &'static str,
    pub party_label: &'static str,
    pub inflow: bool,
    pub rows: Vec<MovementRow>,
}

impl MovementSection {
    #[must_use]
    pub fn total(&self) -> Money {
        self.rows.iter().map(|r| r.amount).sum()
    }
}

/// Sections for the non-empty groups, in display order.
fn sections(groups: &MovementGroups) -> Vec<MovementSection> {
    let section = |title, reference_label, party_label, inflow, rows: Vec<MovementRow>| {
        MovementSection {
            title,
            reference_label,
            party_label,
            inflow,
            rows,
        }
    };
    [
        section(
            "Ventas",
            "Venta",
            "Cliente",
            true,
            groups.sales.iter().map(MovementRow::sale).collect(),
        ),
        section(
            "Compras",
            "Compra",
            "Proveedor",
            false,
            groups.purchases.iter().map(MovementRow::purchase).collect(),
        ),
        section(
            "Abonos de clientes",
            "Venta",
            "Cliente",
            true,
            groups
                .installments_in
                .iter()
                .map(|m| MovementRow::installment(m, InstallmentSide::Client))
                .collect(),
        ),
        section(
            "Abonos a proveedores",
            "Compra",
            "Proveedor",
            false,
            groups
                .installments_out
                .iter()
                .map(|m| MovementRow::installment(m, InstallmentSide::Supplier))
                .collect(),
        ),
        section(
            "Egresos",
            "",
            "",
            false,
            groups.expenses.iter().map(MovementRow::base).collect(),
        ),
        section(
            "Ingresos",
            "",
            "",
            true,
            groups.incomes.iter().map(MovementRow::base).collect(),
        ),
    ]
    .into_iter()
    .filter(|s| !s.rows.is_empty())
    .collect()
}

// =============================================================================
// Register page
// =============================================================================

/// Raw closing form. Dates are `yyyy-mm-dd`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloseForm {
    #[serde(default)]
    pub fecha_inicio: String,
    #[serde(default)]
    pub fecha_fin: String,
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

impl CloseForm {
    /// The start date defaults to today.
    fn request(&self, today: NaiveDate) -> Result<CloseRequest, crate::error::ValidationError> {
        let start = parse_day(&self.fecha_inicio).unwrap_or(today);
        CloseRequest::new(start, parse_day(&self.fecha_fin))
    }
}

/// Cash register template.
#[derive(Template)]
#[template(path = "cash/index.html")]
pub struct CashTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub summary: CashSummary,
    pub accounts: Vec<Account>,
    pub sections: Vec<MovementSection>,
    pub closures: Vec<Closure>,
    pub form: CloseForm,
    pub close_error: Option<String>,
}

async fn cash_page(
    state: &AppState,
    notice: Option<Notice>,
    form: CloseForm,
    close_error: Option<String>,
) -> PageResult {
    let api = state.api();
    let (accounts, movements, receivables, payables, closures) = tokio::join!(
        api.list_accounts(),
        api.open_movements(),
        api.receivables(),
        api.payables(),
        api.list_closures(),
    );

    let mut failed = false;
    let mut log_failure = |what: &str, e: &dyn std::fmt::Display| {
        tracing::error!(error = %e, "Failed to fetch {what}");
        failed = true;
    };
    let accounts = accounts.unwrap_or_else(|e| {
        log_failure("accounts", &e);
        Vec::new()
    });
    let movements = movements.unwrap_or_else(|e| {
        log_failure("movements", &e);
        Vec::new()
    });
    let receivables = receivables.unwrap_or_else(|e| {
        log_failure("receivables", &e);
        Vec::new()
    });
    let payables = payables.unwrap_or_else(|e| {
        log_failure("payables", &e);
        Vec::new()
    });
    let mut closures = closures.unwrap_or_else(|e| {
        log_failure("closures", &e);
        Vec::new()
    });
    closures.truncate(RECENT_CLOSURES);

    let form = CloseForm {
        fecha_inicio: if form.fecha_inicio.is_empty() {
            chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
        } else {
            form.fecha_inicio
        },
        ..form
    };

    render(&CashTemplate {
        current_path: "/cash".to_string(),
        notice,
        error: failed.then(|| LOAD_ERROR.to_string()),
        summary: CashSummary::compute(&accounts, &receivables, &payables),
        accounts,
        sections: sections(&MovementGroups::split(movements)),
        closures,
        form,
        close_error,
    })
}

/// Cash register page handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<NoticeQuery>) -> PageResult {
    cash_page(&state, query.resolve(), CloseForm::default(), None).await
}

/// Close register handler.
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>, Form(form): Form<CloseForm>) -> impl IntoResponse {
    let today = chrono::Local::now().date_naive();
    let request = match form.request(today) {
        Ok(request) => request,
        Err(e) => return cash_page(&state, None, form, Some(e.message)).await.into_response(),
    };

    match state.api().close_register(&request.to_api()).await {
        Ok(closure) => {
            tracing::info!(closure_id = %closure.id, start = %request.start, end = %request.end, "Register closed");
            Redirect::to("/cash?notice=register_closed").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to close register");
            cash_page(&state, None, form, Some(e.user_message()))
                .await
                .into_response()
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// Printable movement receipt.
#[derive(Template)]
#[template(path = "cash/receipt.html")]
pub struct ReceiptTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub movement: Movement,
    pub inflow: bool,
    pub sale: Option<Sale>,
    pub purchase: Option<Purchase>,
}

/// Movement receipt handler.
#[instrument(skip(state))]
pub async fn receipt(
    State(state): State<AppState>,
    Path(id): Path<MovementId>,
) -> PageResult {
    let movement = state.api().get_movement(id).await?;

    let mut error = None;
    let sale = match &movement.venta_info {
        Some(info) => state
            .api()
            .get_sale(info.id)
            .await
            .map_err(|e| {
                tracing::warn!(movement_id = %id, error = %e, "Failed to fetch sale for receipt");
                error = Some("No se pudo cargar el detalle de la venta".to_string());
            })
            .ok(),
        None => None,
    };
    let purchase = match &movement.compra_info {
        Some(info) => state
            .api()
            .get_purchase(info.id)
            .await
            .map_err(|e| {
                tracing::warn!(movement_id = %id, error = %e, "Failed to fetch purchase for receipt");
                error = Some("No se pudo cargar el detalle de la compra".to_string());
            })
            .ok(),
        None => None,
    };

    render(&ReceiptTemplate {
        current_path: "/cash".to_string(),
        notice: None,
        error,
        inflow: movement.direction() == Some(MovementDirection::Inflow),
        movement,
        sale,
        purchase,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cash", get(index))
        .route("/cash/close", post(close))
        .route("/cash/movements/{id}", get(receipt))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_skip_empty_groups() {
        let movements: Vec<Movement> = serde_json::from_value(serde_json::json!([
            {"id": 1, "monto": "500", "descripcion": "Venta #12 - Ana Torres", "venta_info": {"id": 12, "total": "500"}},
            {"id": 2, "monto": "80", "descripcion": "Abono de cliente Luis - Venta #9",
             "cuota_info": {"id": 3, "monto": "80"}, "tipo_movimiento": {"nombre": "Abono", "tipo": "E"}}
        ]))
        .unwrap();
        let sections = sections(&MovementGroups::split(movements));
        let titles: Vec<_> = sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Ventas", "Abonos de clientes"]);
        assert_eq!(sections[0].rows[0].reference, "12");
        assert_eq!(sections[0].rows[0].party, "Ana Torres");
        assert_eq!(sections[1].rows[0].reference, "9");
        assert_eq!(sections[1].rows[0].party, "Luis");
        assert_eq!(sections[0].total(), Money::from_pesos(500));
    }

    #[test]
    fn test_close_form_defaults_start_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let form = CloseForm {
            fecha_inicio: String::new(),
            fecha_fin: "2025-03-10".to_string(),
        };
        let request = form.request(today).unwrap();
        assert_eq!(request.start, today);

        let missing_end = CloseForm::default().request(today).unwrap_err();
        assert_eq!(
            missing_end.message,
            "Debe seleccionar una fecha de fin para cerrar la caja"
        );
    }
}
