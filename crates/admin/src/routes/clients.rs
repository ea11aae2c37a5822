//! Client route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use joyeria_core::ClientId;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    api::{Client, ClientInput, Sale},
    components::{Notice, NoticeQuery},
    filters,
    services::{parties::validate_client, trade::sales_for_client},
    state::AppState,
};

use super::{PageResult, render, with_query};

const LOAD_ERROR: &str = "No se pudieron cargar los clientes";

/// List query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ClientsQuery {
    #[serde(default)]
    pub q: String,
    pub archived: Option<String>,
    pub open: Option<i64>,
}

impl ClientsQuery {
    fn archived(&self) -> bool {
        self.archived.as_deref() == Some("true")
    }
}

/// An expanded client row with their purchases from the store.
#[derive(Debug, Clone)]
pub struct ClientDetail {
    pub client: Client,
    pub sales: Vec<Sale>,
    pub error: Option<String>,
}

/// Clients list template.
#[derive(Template)]
#[template(path = "clients/index.html")]
pub struct ClientsIndexTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub clients: Vec<Client>,
    pub search_query: String,
    pub archived: bool,
    pub detail: Option<ClientDetail>,
}

impl ClientsIndexTemplate {
    /// Link that expands `id`, or collapses it when already open.
    fn toggle_href(&self, id: &ClientId) -> String {
        let open = self.detail.as_ref().is_some_and(|d| d.client.id == *id);
        let id = id.to_string();
        with_query(
            "/clients",
            &[
                ("q", self.search_query.as_str()),
                ("archived", if self.archived { "true" } else { "" }),
                ("open", if open { "" } else { id.as_str() }),
            ],
        )
    }
}

/// Client form template, shared by create and edit.
#[derive(Template)]
#[template(path = "clients/form.html")]
pub struct ClientFormTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub title: String,
    pub action: String,
    pub input: ClientInput,
}

/// Clients list page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ClientsQuery>,
    Query(notice): Query<NoticeQuery>,
) -> PageResult {
    let archived = query.archived();
    let result = if query.q.trim().is_empty() || archived {
        state.api().list_clients(archived).await
    } else {
        state.api().search_clients(&query.q).await
    };

    let (clients, error) = match result {
        Ok(clients) => (clients, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch clients");
            (Vec::new(), Some(LOAD_ERROR.to_string()))
        }
    };

    let detail = if let Some(id) = query.open {
        load_detail(&state, ClientId::new(id)).await
    } else {
        None
    };

    render(&ClientsIndexTemplate {
        current_path: "/clients".to_string(),
        notice: notice.resolve(),
        error,
        clients,
        search_query: query.q,
        archived,
        detail,
    })
}

async fn load_detail(state: &AppState, id: ClientId) -> Option<ClientDetail> {
    let (client, sales) = tokio::join!(state.api().get_client(id), state.api().list_sales());
    let client = match client {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(client_id = %id, error = %e, "Failed to fetch client");
            return None;
        }
    };
    let (sales, error) = match sales {
        Ok(sales) => (sales_for_client(&sales, id), None),
        Err(e) => {
            tracing::warn!(client_id = %id, error = %e, "Failed to fetch client sales");
            (
                Vec::new(),
                Some("No se pudo cargar el historial de compras".to_string()),
            )
        }
    };
    Some(ClientDetail {
        client,
        sales,
        error,
    })
}

fn form_page(title: &str, action: String, input: ClientInput, error: Option<String>) -> PageResult {
    render(&ClientFormTemplate {
        current_path: "/clients".to_string(),
        notice: None,
        error,
        title: title.to_string(),
        action,
        input,
    })
}

/// New client form handler.
pub async fn new() -> PageResult {
    form_page(
        "Nuevo cliente",
        "/clients".to_string(),
        ClientInput::default(),
        None,
    )
}

/// Create client handler.
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Form(input): Form<ClientInput>,
) -> impl IntoResponse {
    let clean = match validate_client(&input) {
        Ok(clean) => clean,
        Err(e) => {
            return form_page("Nuevo cliente", "/clients".to_string(), input, Some(e.message))
                .into_response();
        }
    };

    match state.api().create_client(&clean).await {
        Ok(client) => {
            tracing::info!(client_id = %client.id, "Client created");
            Redirect::to("/clients?notice=client_created").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create client");
            form_page(
                "Nuevo cliente",
                "/clients".to_string(),
                input,
                Some(e.user_message()),
            )
            .into_response()
        }
    }
}

/// Edit client form handler.
#[instrument(skip(state))]
pub async fn edit(State(state): State<AppState>, Path(id): Path<ClientId>) -> impl IntoResponse {
    match state.api().get_client(id).await {
        Ok(client) => form_page(
            "Editar cliente",
            format!("/clients/{id}"),
            ClientInput::from(&client),
            None,
        )
        .into_response(),
        Err(e) => {
            tracing::error!(client_id = %id, error = %e, "Failed to fetch client");
            form_page(
                "Editar cliente",
                format!("/clients/{id}"),
                ClientInput::default(),
                Some(LOAD_ERROR.to_string()),
            )
            .into_response()
        }
    }
}

/// Update client handler.
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    Form(input): Form<ClientInput>,
) -> impl IntoResponse {
    let action = format!("/clients/{id}");
    let clean = match validate_client(&input) {
        Ok(clean) => clean,
        Err(e) => return form_page("Editar cliente", action, input, Some(e.message)).into_response(),
    };

    match state.api().update_client(id, &clean).await {
        Ok(_) => {
            tracing::info!(client_id = %id, "Client updated");
            Redirect::to("/clients?notice=client_updated").into_response()
        }
        Err(e) => {
            tracing::error!(client_id = %id, error = %e, "Failed to update client");
            form_page("Editar cliente", action, input, Some(e.user_message())).into_response()
        }
    }
}

/// Archive client handler.
#[instrument(skip(state))]
pub async fn archive(State(state): State<AppState>, Path(id): Path<ClientId>) -> Redirect {
    match state.api().archive_client(id).await {
        Ok(()) => {
            tracing::info!(client_id = %id, "Client archived");
            Redirect::to("/clients?notice=client_archived")
        }
        Err(e) => {
            tracing::error!(client_id = %id, error = %e, "Failed to archive client");
            Redirect::to("/clients?notice=archive_failed")
        }
    }
}

/// Restore client handler.
#[instrument(skip(state))]
pub async fn unarchive(State(state): State<AppState>, Path(id): Path<ClientId>) -> Redirect {
    match state.api().unarchive_client(id).await {
        Ok(()) => {
            tracing::info!(client_id = %id, "Client restored");
            Redirect::to("/clients?archived=true&notice=client_restored")
        }
        Err(e) => {
            tracing::error!(client_id = %id, error = %e, "Failed to restore client");
            Redirect::to("/clients?archived=true&notice=restore_failed")
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(index).post(create))
        .route("/clients/new", get(new))
        .route("/clients/{id}", post(update))
        .route("/clients/{id}/edit", get(edit))
        .route("/clients/{id}/archive", post(archive))
        .route("/clients/{id}/unarchive", post(unarchive))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(id: i64, nombre: &str) -> Client {
        serde_json::from_value(serde_json::json!({"id": id, "nombre": nombre})).unwrap()
    }

    fn page_with_open(open: i64) -> ClientsIndexTemplate {
        ClientsIndexTemplate {
            current_path: "/clients".to_string(),
            notice: None,
            error: None,
            clients: vec![client(1, "Ana Torres"), client(2, "Luis Pérez")],
            search_query: "ana".to_string(),
            archived: false,
            detail: Some(ClientDetail {
                client: client(open, "Ana Torres"),
                sales: Vec::new(),
                error: None,
            }),
        }
    }

    #[test]
    fn test_toggle_href_collapses_open_row_and_expands_others() {
        let page = page_with_open(1);
        assert_eq!(page.toggle_href(&ClientId::new(1)), "/clients?q=ana");
        assert_eq!(page.toggle_href(&ClientId::new(2)), "/clients?q=ana&open=2");
    }

    #[test]
    fn test_index_renders_toggle_links_for_each_row() {
        let html = page_with_open(1).render().unwrap();
        assert!(html.contains(r#"href="/clients?q=ana""#));
        assert!(html.contains("open=2"));
        assert!(html.contains("Luis Pérez"));
    }
}
