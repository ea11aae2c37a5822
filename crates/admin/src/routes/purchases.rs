//! Purchase form route handlers.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::Form;
use joyeria_core::Money;
use tracing::instrument;

use crate::{
    api::{Garment, PaymentMethod, Supplier},
    components::{Notice, NoticeQuery},
    filters,
    services::{
        inventory::split_archived,
        trade::{FormAction, PurchaseDraft, PurchaseForm},
    },
    state::AppState,
};

use super::{PageResult, render};

/// Purchase form template.
#[derive(Template)]
#[template(path = "trade/purchase.html")]
pub struct PurchaseTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub suppliers: Vec<Supplier>,
    pub methods: Vec<PaymentMethod>,
    pub catalogue: Vec<Garment>,
    pub draft: PurchaseDraft,
    pub total: Money,
}

struct Choices {
    suppliers: Vec<Supplier>,
    methods: Vec<PaymentMethod>,
    catalogue: Vec<Garment>,
    error: Option<String>,
}

async fn load_choices(state: &AppState) -> Choices {
    let api = state.api();
    let (suppliers, methods, garments) = tokio::join!(
        api.list_suppliers(false),
        api.payment_methods(),
        api.list_garments()
    );

    let mut error = None;
    let suppliers = suppliers.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch suppliers");
        error = Some("No se pudieron cargar los proveedores".to_string());
        Vec::new()
    });
    let methods = methods.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch payment methods");
        error = Some("No se pudieron cargar los métodos de pago".to_string());
        Vec::new()
    });
    // Any active garment can be restocked, including sold-out ones.
    let catalogue = garments.map(|g| split_archived(g).0).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch garments");
        error = Some("No se pudieron cargar las prendas".to_string());
        Vec::new()
    });
    Choices {
        suppliers,
        methods,
        catalogue,
        error,
    }
}

fn page(
    choices: Choices,
    form: PurchaseForm,
    notice: Option<Notice>,
    error: Option<String>,
) -> PageResult {
    let draft = PurchaseDraft::new(form, &choices.catalogue);
    render(&PurchaseTemplate {
        current_path: "/purchases/new".to_string(),
        notice,
        error: error.or(choices.error),
        suppliers: choices.suppliers,
        methods: choices.methods,
        total: draft.total(),
        catalogue: choices.catalogue,
        draft,
    })
}

/// New purchase form handler.
#[instrument(skip(state))]
pub async fn new(State(state): State<AppState>, Query(notice): Query<NoticeQuery>) -> PageResult {
    let choices = load_choices(&state).await;
    page(choices, PurchaseForm::blank(), notice.resolve(), None)
}

/// Purchase form submission.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(mut form): Form<PurchaseForm>,
) -> impl IntoResponse {
    let choices = load_choices(&state).await;

    match form.action() {
        FormAction::AddRow => {
            form.add_row();
            page(choices, form, None, None).into_response()
        }
        FormAction::Preview => page(choices, form, None, None).into_response(),
        FormAction::Submit => {
            let draft = PurchaseDraft::new(form, &choices.catalogue);
            let purchase = match draft.validate() {
                Ok(purchase) => purchase,
                Err(e) => return page(choices, draft.form, None, Some(e.message)).into_response(),
            };

            match state.api().create_purchase(&purchase).await {
                Ok(created) => {
                    tracing::info!(purchase_id = %created.id, supplier_id = %purchase.proveedor, "Purchase recorded");
                    Redirect::to("/purchases/new?notice=purchase_created").into_response()
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to record purchase");
                    page(choices, draft.form, None, Some(e.user_message())).into_response()
                }
            }
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/purchases/new", get(new))
        .route("/purchases", post(submit))
}
