//! Inventory route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use joyeria_core::GarmentId;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    api::{Garment, GarmentType, GoldType},
    components::{
        Notice, NoticeQuery, SortState,
        data_table::{DataTableConfig, inventory_table_config},
    },
    filters,
    services::inventory::{
        self, ALL, GarmentFilter, GarmentForm, GoldSummary, sort_garments, split_archived,
    },
    state::AppState,
};

use super::{PageResult, render, with_query};

const LOAD_ERROR: &str = "No se pudieron cargar las prendas";

/// Sort parameters for the inventory table.
#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
    pub dir: Option<String>,
}

/// A table header with the link that advances its sort.
#[derive(Debug, Clone)]
pub struct HeaderView {
    pub label: String,
    pub numeric: bool,
    /// `None` for columns that cannot be sorted.
    pub href: Option<String>,
    pub indicator: &'static str,
}

fn filter_pairs(filter: &GarmentFilter) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("q", filter.search.trim().to_string())];
    if filter.gold_selected() != ALL {
        pairs.push(("gold", filter.gold_selected().to_string()));
    }
    if filter.garment_type_selected() != ALL {
        pairs.push(("garment_type", filter.garment_type_selected().to_string()));
    }
    if filter.scrap() {
        pairs.push(("scrap_only", "on".to_string()));
    }
    if filter.recoverable() {
        pairs.push(("recoverable_only", "on".to_string()));
    }
    pairs
}

fn headers(config: &DataTableConfig, filter: &GarmentFilter, sort: &SortState) -> Vec<HeaderView> {
    let base = filter_pairs(filter);
    config
        .columns
        .iter()
        .map(|column| {
            let href = column.sortable.then(|| {
                let next = sort.next(&column.key);
                let mut pairs: Vec<(&str, &str)> =
                    base.iter().map(|(k, v)| (*k, v.as_str())).collect();
                if let (Some(key), Some(direction)) = (next.key.as_deref(), next.direction) {
                    pairs.push(("sort", key));
                    pairs.push(("dir", direction.as_str()));
                }
                with_query("/inventory", &pairs)
            });
            HeaderView {
                label: column.label.clone(),
                numeric: column.numeric,
                href,
                indicator: sort.indicator(&column.key),
            }
        })
        .collect()
}

/// Inventory page template.
#[derive(Template)]
#[template(path = "inventory/index.html")]
pub struct InventoryIndexTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub summaries: Vec<GoldSummary>,
    pub headers: Vec<HeaderView>,
    pub garments: Vec<Garment>,
    pub filter: GarmentFilter,
    pub gold_options: Vec<String>,
    pub type_options: Vec<String>,
    pub empty_title: String,
    pub search_placeholder: String,
}

/// Archived garments template.
#[derive(Template)]
#[template(path = "inventory/archived.html")]
pub struct InventoryArchivedTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub garments: Vec<Garment>,
}

/// Garment form template, shared by create and edit.
#[derive(Template)]
#[template(path = "inventory/form.html")]
pub struct GarmentFormTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub title: String,
    pub action: String,
    pub editing: bool,
    pub form: GarmentForm,
    /// Read-only labels on the edit form.
    pub gold_label: String,
    pub type_label: String,
    pub gold_types: Vec<GoldType>,
    pub garment_types: Vec<GarmentType>,
}

/// Inventory page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(mut filter): Query<GarmentFilter>,
    Query(sort): Query<SortQuery>,
    Query(notice): Query<NoticeQuery>,
) -> PageResult {
    let config = inventory_table_config();
    let sort = SortState::from_query(sort.sort.as_deref(), sort.dir.as_deref(), &config.sort_keys());

    let mut error = None;
    if let Err(e) = filter.validate() {
        error = Some(e.message);
        filter.scrap_only = None;
        filter.recoverable_only = None;
    }

    let active = match state.api().list_garments().await {
        Ok(garments) => split_archived(garments).0,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch garments");
            error = Some(LOAD_ERROR.to_string());
            Vec::new()
        }
    };

    let summaries = GoldSummary::summarised(&active);
    let gold_options = inventory::gold_type_names(&active);
    let type_options = inventory::garment_type_names(&active);
    let mut garments = filter.apply(active);
    sort_garments(&mut garments, &sort);

    render(&InventoryIndexTemplate {
        current_path: "/inventory".to_string(),
        notice: notice.resolve(),
        error,
        summaries,
        headers: headers(&config, &filter, &sort),
        garments,
        filter,
        gold_options,
        type_options,
        empty_title: config.empty_title,
        search_placeholder: config.search_placeholder,
    })
}

/// Archived garments handler.
#[instrument(skip(state))]
pub async fn archived(
    State(state): State<AppState>,
    Query(notice): Query<NoticeQuery>,
) -> PageResult {
    let (garments, error) = match state.api().list_garments().await {
        Ok(garments) => (split_archived(garments).1, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch garments");
            (Vec::new(), Some(LOAD_ERROR.to_string()))
        }
    };

    render(&InventoryArchivedTemplate {
        current_path: "/inventory".to_string(),
        notice: notice.resolve(),
        error,
        garments,
    })
}

async fn new_form_page(state: &AppState, form: GarmentForm, error: Option<String>) -> PageResult {
    let (gold_types, garment_types) = tokio::join!(
        state.api().list_gold_types(),
        state.api().list_garment_types()
    );
    let mut error = error;
    let gold_types = gold_types.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch gold types");
        error.get_or_insert_with(|| "No se pudieron cargar los tipos de oro".to_string());
        Vec::new()
    });
    let garment_types = garment_types.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch garment types");
        error.get_or_insert_with(|| "No se pudieron cargar los tipos de prenda".to_string());
        Vec::new()
    });

    render(&GarmentFormTemplate {
        current_path: "/inventory".to_string(),
        notice: None,
        error,
        title: "Agregar prenda".to_string(),
        action: "/inventory".to_string(),
        editing: false,
        form,
        gold_label: String::new(),
        type_label: String::new(),
        gold_types,
        garment_types,
    })
}

fn edit_form_page(
    id: GarmentId,
    garment: Option<&Garment>,
    form: GarmentForm,
    error: Option<String>,
) -> PageResult {
    render(&GarmentFormTemplate {
        current_path: "/inventory".to_string(),
        notice: None,
        error,
        title: "Editar prenda".to_string(),
        action: format!("/inventory/{id}"),
        editing: true,
        form,
        gold_label: garment.map(|g| g.tipo_oro_nombre.clone()).unwrap_or_default(),
        type_label: garment
            .map(|g| g.tipo_prenda_nombre.clone())
            .unwrap_or_default(),
        gold_types: Vec::new(),
        garment_types: Vec::new(),
    })
}

/// New garment form handler.
#[instrument(skip(state))]
pub async fn new(State(state): State<AppState>) -> PageResult {
    let form = GarmentForm {
        existencia: "1".to_string(),
        ..GarmentForm::default()
    };
    new_form_page(&state, form, None).await
}

/// Create garment handler.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<GarmentForm>,
) -> impl IntoResponse {
    let garment = match form.validate_new() {
        Ok(garment) => garment,
        Err(e) => return new_form_page(&state, form, Some(e.message)).await.into_response(),
    };

    match state.api().create_garment(&garment).await {
        Ok(created) => {
            tracing::info!(garment_id = %created.id, nombre = %created.nombre, "Garment created");
            Redirect::to("/inventory?notice=garment_created").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create garment");
            new_form_page(&state, form, Some(e.user_message()))
                .await
                .into_response()
        }
    }
}

/// Edit garment form handler.
#[instrument(skip(state))]
pub async fn edit(State(state): State<AppState>, Path(id): Path<GarmentId>) -> PageResult {
    match state.api().get_garment(id).await {
        Ok(garment) => edit_form_page(id, Some(&garment), GarmentForm::from(&garment), None),
        Err(e) => {
            tracing::error!(garment_id = %id, error = %e, "Failed to fetch garment");
            edit_form_page(id, None, GarmentForm::default(), Some(LOAD_ERROR.to_string()))
        }
    }
}

/// Update garment handler.
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<GarmentId>,
    Form(form): Form<GarmentForm>,
) -> impl IntoResponse {
    let result = match form.validate_edit() {
        Ok(patch) => state
            .api()
            .patch_garment(id, &patch)
            .await
            .map_err(|e| {
                tracing::error!(garment_id = %id, error = %e, "Failed to update garment");
                e.user_message()
            }),
        Err(e) => Err(e.message),
    };

    match result {
        Ok(_) => {
            tracing::info!(garment_id = %id, "Garment updated");
            Redirect::to("/inventory?notice=garment_updated").into_response()
        }
        Err(message) => {
            let garment = state.api().get_garment(id).await.ok();
            edit_form_page(id, garment.as_ref(), form, Some(message)).into_response()
        }
    }
}

/// Archive garment handler.
#[instrument(skip(state))]
pub async fn archive(State(state): State<AppState>, Path(id): Path<GarmentId>) -> Redirect {
    match state.api().archive_garment(id).await {
        Ok(_) => {
            tracing::info!(garment_id = %id, "Garment archived");
            Redirect::to("/inventory?notice=garment_archived")
        }
        Err(e) => {
            tracing::error!(garment_id = %id, error = %e, "Failed to archive garment");
            Redirect::to("/inventory?notice=archive_failed")
        }
    }
}

/// Restore garment handler.
#[instrument(skip(state))]
pub async fn unarchive(State(state): State<AppState>, Path(id): Path<GarmentId>) -> Redirect {
    match state.api().unarchive_garment(id).await {
        Ok(_) => {
            tracing::info!(garment_id = %id, "Garment restored");
            Redirect::to("/inventory/archived?notice=garment_restored")
        }
        Err(e) => {
            tracing::error!(garment_id = %id, error = %e, "Failed to restore garment");
            Redirect::to("/inventory/archived?notice=restore_failed")
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(index).post(create))
        .route("/inventory/archived", get(archived))
        .route("/inventory/new", get(new))
        .route("/inventory/{id}", post(update))
        .route("/inventory/{id}/edit", get(edit))
        .route("/inventory/{id}/archive", post(archive))
        .route("/inventory/{id}/unarchive", post(unarchive))
}
