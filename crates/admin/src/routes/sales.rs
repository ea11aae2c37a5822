//! Sale form route handlers.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::Form;
use tracing::instrument;

use crate::{
    api::{Client, Garment, PaymentMethod},
    components::{Notice, NoticeQuery},
    filters,
    services::trade::{self, FormAction, SaleDraft, SaleForm, SaleTotals},
    state::AppState,
};

use super::{PageResult, render};

/// Sale form template.
#[derive(Template)]
#[template(path = "trade/sale.html")]
pub struct SaleTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub clients: Vec<Client>,
    pub methods: Vec<PaymentMethod>,
    pub catalogue: Vec<Garment>,
    pub draft: SaleDraft,
    pub totals: SaleTotals,
}

/// Everything the form needs to offer as choices.
struct Choices {
    clients: Vec<Client>,
    methods: Vec<PaymentMethod>,
    catalogue: Vec<Garment>,
    error: Option<String>,
}

async fn load_choices(state: &AppState) -> Choices {
    let api = state.api();
    let (clients, methods, garments) =
        tokio::join!(api.list_clients(false), api.payment_methods(), api.list_garments());

    let mut error = None;
    let clients = clients.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch clients");
        error = Some("No se pudieron cargar los clientes".to_string());
        Vec::new()
    });
    let methods = methods.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch payment methods");
        error = Some("No se pudieron cargar los métodos de pago".to_string());
        Vec::new()
    });
    let catalogue = garments.map(trade::saleable).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch garments");
        error = Some("No se pudieron cargar las prendas".to_string());
        Vec::new()
    });
    Choices {
        clients,
        methods,
        catalogue,
        error,
    }
}

fn page(choices: Choices, form: SaleForm, notice: Option<Notice>, error: Option<String>) -> PageResult {
    let draft = SaleDraft::new(form, &choices.catalogue);
    render(&SaleTemplate {
        current_path: "/sales/new".to_string(),
        notice,
        error: error.or(choices.error),
        clients: choices.clients,
        methods: choices.methods,
        totals: draft.totals(),
        catalogue: choices.catalogue,
        draft,
    })
}

/// New sale form handler.
#[instrument(skip(state))]
pub async fn new(State(state): State<AppState>, Query(notice): Query<NoticeQuery>) -> PageResult {
    let choices = load_choices(&state).await;
    page(choices, SaleForm::blank(), notice.resolve(), None)
}

/// Sale form submission: add a row, preview totals, or record the sale.
#[instrument(skip(state, form))]
pub async fn submit(State(state): State<AppState>, Form(mut form): Form<SaleForm>) -> impl IntoResponse {
    let choices = load_choices(&state).await;

    match form.action() {
        FormAction::AddRow => {
            form.add_row();
            page(choices, form, None, None).into_response()
        }
        FormAction::Preview => page(choices, form, None, None).into_response(),
        FormAction::Submit => {
            let draft = SaleDraft::new(form, &choices.catalogue);
            let sale = match draft.validate() {
                Ok(sale) => sale,
                Err(e) => return page(choices, draft.form, None, Some(e.message)).into_response(),
            };

            match trade::submit_sale(state.api(), &sale).await {
                Ok(created) => {
                    tracing::info!(sale_id = %created.id, client_id = %sale.client, "Sale recorded");
                    Redirect::to("/sales/new?notice=sale_created").into_response()
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to record sale");
                    page(choices, draft.form, None, Some(e.user_message())).into_response()
                }
            }
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales/new", get(new))
        .route("/sales", post(submit))
}
