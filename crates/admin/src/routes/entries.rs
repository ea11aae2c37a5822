//! Expense and income route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    routing::get,
};
use tracing::instrument;

use crate::{
    api::{Entry, PaymentMethod},
    components::{Notice, NoticeQuery},
    filters,
    services::entries::{EntryForm, EntryKind, recent},
    state::AppState,
};

use super::{PageResult, render, with_query};

/// Entry form template, shared by expenses and incomes.
#[derive(Template)]
#[template(path = "entries/index.html")]
pub struct EntriesTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub kind: EntryKind,
    pub methods: Vec<PaymentMethod>,
    pub entries: Vec<Entry>,
    pub form: EntryForm,
}

impl EntriesTemplate {
    fn method_name(&self, entry: &Entry) -> String {
        entry
            .metodo_pago
            .and_then(|id| self.methods.iter().find(|m| m.id == id))
            .map_or_else(|| "—".to_string(), |m| m.nombre.clone())
    }
}

async fn page(
    state: &AppState,
    kind: EntryKind,
    form: EntryForm,
    notice: Option<Notice>,
    error: Option<String>,
) -> PageResult {
    let api = state.api();
    let (methods, entries) = match kind {
        EntryKind::Expense => tokio::join!(api.payment_methods(), api.list_expenses()),
        EntryKind::Income => tokio::join!(api.payment_methods(), api.list_incomes()),
    };

    let mut load_error = None;
    let methods = methods.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch payment methods");
        load_error = Some("No se pudieron cargar los métodos de pago".to_string());
        Vec::new()
    });
    let entries = entries.map(recent).unwrap_or_else(|e| {
        tracing::error!(kind = ?kind, error = %e, "Failed to fetch entries");
        load_error = Some("No se pudieron cargar los registros recientes".to_string());
        Vec::new()
    });

    render(&EntriesTemplate {
        current_path: kind.path().to_string(),
        notice,
        error: error.or(load_error),
        kind,
        methods,
        entries,
        form,
    })
}

async fn create(state: &AppState, kind: EntryKind, form: EntryForm) -> axum::response::Response {
    let entry = match form.validate() {
        Ok(entry) => entry,
        Err(e) => return page(state, kind, form, None, Some(e.message)).await.into_response(),
    };

    let result = match kind {
        EntryKind::Expense => state.api().create_expense(&entry).await,
        EntryKind::Income => state.api().create_income(&entry).await,
    };
    match result {
        Ok(created) => {
            tracing::info!(kind = ?kind, entry_id = %created.id, amount = %entry.monto, "Entry recorded");
            Redirect::to(&with_query(kind.path(), &[("notice", kind.notice())])).into_response()
        }
        Err(e) => {
            tracing::error!(kind = ?kind, error = %e, "Failed to record entry");
            page(state, kind, form, None, Some(e.user_message()))
                .await
                .into_response()
        }
    }
}

/// Expenses page handler.
#[instrument(skip(state))]
pub async fn expenses(State(state): State<AppState>, Query(notice): Query<NoticeQuery>) -> PageResult {
    page(&state, EntryKind::Expense, EntryForm::default(), notice.resolve(), None).await
}

/// Record expense handler.
#[instrument(skip(state, form))]
pub async fn create_expense(
    State(state): State<AppState>,
    Form(form): Form<EntryForm>,
) -> impl IntoResponse {
    create(&state, EntryKind::Expense, form).await
}

/// Incomes page handler.
#[instrument(skip(state))]
pub async fn incomes(State(state): State<AppState>, Query(notice): Query<NoticeQuery>) -> PageResult {
    page(&state, EntryKind::Income, EntryForm::default(), notice.resolve(), None).await
}

/// Record income handler.
#[instrument(skip(state, form))]
pub async fn create_income(
    State(state): State<AppState>,
    Form(form): Form<EntryForm>,
) -> impl IntoResponse {
    create(&state, EntryKind::Income, form).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(expenses).post(create_expense))
        .route("/incomes", get(incomes).post(create_income))
}
