//! Supplier route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use joyeria_core::SupplierId;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    api::{Purchase, Supplier, SupplierInput},
    components::{Notice, NoticeQuery},
    filters,
    services::{parties::validate_supplier, trade::purchases_for_supplier},
    state::AppState,
};

use super::{PageResult, render, with_query};

const LOAD_ERROR: &str = "No se pudieron cargar los proveedores";

/// List query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SuppliersQuery {
    #[serde(default)]
    pub q: String,
    pub archived: Option<String>,
    pub open: Option<i64>,
}

impl SuppliersQuery {
    fn archived(&self) -> bool {
        self.archived.as_deref() == Some("true")
    }
}

/// An expanded supplier row with the store's purchases from them.
#[derive(Debug, Clone)]
pub struct SupplierDetail {
    pub supplier: Supplier,
    pub purchases: Vec<Purchase>,
    pub error: Option<String>,
}

/// Suppliers list template.
#[derive(Template)]
#[template(path = "suppliers/index.html")]
pub struct SuppliersIndexTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub suppliers: Vec<Supplier>,
    pub search_query: String,
    pub archived: bool,
    pub detail: Option<SupplierDetail>,
}

impl SuppliersIndexTemplate {
    /// Link that expands `id`, or collapses it when already open.
    fn toggle_href(&self, id: &SupplierId) -> String {
        let open = self.detail.as_ref().is_some_and(|d| d.supplier.id == *id);
        let id = id.to_string();
        with_query(
            "/suppliers",
            &[
                ("q", self.search_query.as_str()),
                ("archived", if self.archived { "true" } else { "" }),
                ("open", if open { "" } else { id.as_str() }),
            ],
        )
    }
}

/// Supplier form template, shared by create and edit.
#[derive(Template)]
#[template(path = "suppliers/form.html")]
pub struct SupplierFormTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub title: String,
    pub action: String,
    pub input: SupplierInput,
}

/// Suppliers list page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SuppliersQuery>,
    Query(notice): Query<NoticeQuery>,
) -> PageResult {
    let archived = query.archived();
    let result = if query.q.trim().is_empty() || archived {
        state.api().list_suppliers(archived).await
    } else {
        state.api().search_suppliers(&query.q).await
    };

    let (suppliers, error) = match result {
        Ok(suppliers) => (suppliers, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch suppliers");
            (Vec::new(), Some(LOAD_ERROR.to_string()))
        }
    };

    let detail = if let Some(id) = query.open {
        load_detail(&state, SupplierId::new(id)).await
    } else {
        None
    };

    render(&SuppliersIndexTemplate {
        current_path: "/suppliers".to_string(),
        notice: notice.resolve(),
        error,
        suppliers,
        search_query: query.q,
        archived,
        detail,
    })
}

async fn load_detail(state: &AppState, id: SupplierId) -> Option<SupplierDetail> {
    let (supplier, purchases) =
        tokio::join!(state.api().get_supplier(id), state.api().list_purchases());
    let supplier = match supplier {
        Ok(supplier) => supplier,
        Err(e) => {
            tracing::warn!(supplier_id = %id, error = %e, "Failed to fetch supplier");
            return None;
        }
    };
    let (purchases, error) = match purchases {
        Ok(purchases) => (purchases_for_supplier(&purchases, id), None),
        Err(e) => {
            tracing::warn!(supplier_id = %id, error = %e, "Failed to fetch supplier purchases");
            (
                Vec::new(),
                Some("No se pudo cargar el historial de compras al proveedor".to_string()),
            )
        }
    };
    Some(SupplierDetail {
        supplier,
        purchases,
        error,
    })
}

fn form_page(title: &str, action: String, input: SupplierInput, error: Option<String>) -> PageResult {
    render(&SupplierFormTemplate {
        current_path: "/suppliers".to_string(),
        notice: None,
        error,
        title: title.to_string(),
        action,
        input,
    })
}

/// New supplier form handler.
pub async fn new() -> PageResult {
    form_page(
        "Nuevo proveedor",
        "/suppliers".to_string(),
        SupplierInput::default(),
        None,
    )
}

/// Create supplier handler.
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Form(input): Form<SupplierInput>,
) -> impl IntoResponse {
    let clean = match validate_supplier(&input) {
        Ok(clean) => clean,
        Err(e) => {
            return form_page("Nuevo proveedor", "/suppliers".to_string(), input, Some(e.message))
                .into_response();
        }
    };

    match state.api().create_supplier(&clean).await {
        Ok(supplier) => {
            tracing::info!(supplier_id = %supplier.id, "Supplier created");
            Redirect::to("/suppliers?notice=supplier_created").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create supplier");
            form_page(
                "Nuevo proveedor",
                "/suppliers".to_string(),
                input,
                Some(e.user_message()),
            )
            .into_response()
        }
    }
}

/// Edit supplier form handler.
#[instrument(skip(state))]
pub async fn edit(State(state): State<AppState>, Path(id): Path<SupplierId>) -> impl IntoResponse {
    match state.api().get_supplier(id).await {
        Ok(supplier) => form_page(
            "Editar proveedor",
            format!("/suppliers/{id}"),
            SupplierInput::from(&supplier),
            None,
        )
        .into_response(),
        Err(e) => {
            tracing::error!(supplier_id = %id, error = %e, "Failed to fetch supplier");
            form_page(
                "Editar proveedor",
                format!("/suppliers/{id}"),
                SupplierInput::default(),
                Some(LOAD_ERROR.to_string()),
            )
            .into_response()
        }
    }
}

/// Update supplier handler.
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<SupplierId>,
    Form(input): Form<SupplierInput>,
) -> impl IntoResponse {
    let action = format!("/suppliers/{id}");
    let clean = match validate_supplier(&input) {
        Ok(clean) => clean,
        Err(e) => return form_page("Editar proveedor", action, input, Some(e.message)).into_response(),
    };

    match state.api().update_supplier(id, &clean).await {
        Ok(_) => {
            tracing::info!(supplier_id = %id, "Supplier updated");
            Redirect::to("/suppliers?notice=supplier_updated").into_response()
        }
        Err(e) => {
            tracing::error!(supplier_id = %id, error = %e, "Failed to update supplier");
            form_page("Editar proveedor", action, input, Some(e.user_message())).into_response()
        }
    }
}

/// Archive supplier handler.
#[instrument(skip(state))]
pub async fn archive(State(state): State<AppState>, Path(id): Path<SupplierId>) -> Redirect {
    match state.api().archive_supplier(id).await {
        Ok(()) => {
            tracing::info!(supplier_id = %id, "Supplier archived");
            Redirect::to("/suppliers?notice=supplier_archived")
        }
        Err(e) => {
            tracing::error!(supplier_id = %id, error = %e, "Failed to archive supplier");
            Redirect::to("/suppliers?notice=archive_failed")
        }
    }
}

/// Restore supplier handler.
#[instrument(skip(state))]
pub async fn unarchive(State(state): State<AppState>, Path(id): Path<SupplierId>) -> Redirect {
    match state.api().unarchive_supplier(id).await {
        Ok(()) => {
            tracing::info!(supplier_id = %id, "Supplier restored");
            Redirect::to("/suppliers?archived=true&notice=supplier_restored")
        }
        Err(e) => {
            tracing::error!(supplier_id = %id, error = %e, "Failed to restore supplier");
            Redirect::to("/suppliers?archived=true&notice=restore_failed")
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(index).post(create))
        .route("/suppliers/new", get(new))
        .route("/suppliers/{id}", post(update))
        .route("/suppliers/{id}/edit", get(edit))
        .route("/suppliers/{id}/archive", post(archive))
        .route("/suppliers/{id}/unarchive", post(unarchive))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn supplier(id: i64, nombre: &str) -> Supplier {
        serde_json::from_value(serde_json::json!({"id": id, "nombre": nombre})).unwrap()
    }

    #[test]
    fn test_index_links_expand_and_collapse_suppliers() {
        let page = SuppliersIndexTemplate {
            current_path: "/suppliers".to_string(),
            notice: None,
            error: None,
            suppliers: vec![supplier(3, "Oro del Valle"), supplier(4, "Fundición Sur")],
            search_query: String::new(),
            archived: true,
            detail: Some(SupplierDetail {
                supplier: supplier(3, "Oro del Valle"),
                purchases: Vec::new(),
                error: None,
            }),
        };

        assert_eq!(page.toggle_href(&SupplierId::new(3)), "/suppliers?archived=true");
        assert_eq!(page.toggle_href(&SupplierId::new(4)), "/suppliers?archived=true&open=4");
        let html = page.render().unwrap();
        assert!(html.contains("Fundición Sur"));
        assert!(html.contains("open=4"));
    }
}
