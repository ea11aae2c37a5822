//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness
//! GET  /health/ready                    - Readiness (pings the store API)
//!
//! # Dashboard
//! GET  /                                - Inicio
//!
//! # Clients / Suppliers
//! GET  /clients                         - List, search (q), archived, open=<id>
//! GET  /clients/new                     - New client form
//! POST /clients                         - Create client
//! GET  /clients/{id}/edit               - Edit form
//! POST /clients/{id}                    - Update client
//! POST /clients/{id}/archive            - Archive
//! POST /clients/{id}/unarchive          - Restore
//! ...  /suppliers                       - Same shape as clients
//!
//! # Inventory
//! GET  /inventory                       - Gold summaries, filters, sorting
//! GET  /inventory/archived              - Archived garments
//! GET  /inventory/new                   - New garment form
//! POST /inventory                       - Create garment
//! GET  /inventory/{id}/edit             - Edit form
//! POST /inventory/{id}                  - Update garment
//! POST /inventory/{id}/archive          - Archive
//! POST /inventory/{id}/unarchive        - Restore
//!
//! # Debts
//! GET  /receivables                     - Debts by client (status, q)
//! GET  /receivables/{kind}/{id}/pay     - Installment form
//! POST /receivables/{kind}/{id}/pay     - Record installment
//! POST /receivables/{kind}/{id}/cancel  - Cancel debt
//! ...  /payables                        - Same shape, credits only
//!
//! # Cash register
//! GET  /cash                            - Summary, accounts, open movements
//! POST /cash/close                      - Close the register
//! GET  /cash/movements/{id}             - Movement receipt
//!
//! # Trade
//! GET  /sales/new, POST /sales          - Sale form (add_row, preview, submit)
//! GET  /purchases/new, POST /purchases  - Purchase form
//!
//! # Entries
//! GET  /expenses, POST /expenses        - Expenses with recent entries
//! GET  /incomes, POST /incomes          - Incomes with recent entries
//! ```

pub mod cash;
pub mod clients;
pub mod dashboard;
pub mod debts;
pub mod entries;
pub mod health;
pub mod inventory;
pub mod purchases;
pub mod sales;
pub mod suppliers;

use askama::Template;
use axum::{Router, response::Html};

use crate::{error::AppError, state::AppState};

/// A rendered page, or the error that stopped it rendering.
pub(crate) type PageResult = Result<Html<String>, AppError>;

/// Every page route, without health checks or static files.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(clients::router())
        .merge(suppliers::router())
        .merge(inventory::router())
        .merge(debts::router())
        .merge(cash::router())
        .merge(sales::router())
        .merge(purchases::router())
        .merge(entries::router())
}

/// Render a page. Template failures become a 500.
pub(crate) fn render<T: Template>(template: &T) -> PageResult {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("template render failed: {e}")))
}

/// Build `path?key=value&...`, skipping empty values.
pub(crate) fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs.iter().filter(|(_, v)| !v.is_empty()) {
        query.append_pair(key, value);
        any = true;
    }
    if any {
        format!("{path}?{}", query.finish())
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use axum::{http::StatusCode, response::IntoResponse};

    use super::*;

    struct Unprintable;

    impl fmt::Display for Unprintable {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[derive(Template)]
    #[template(source = "<p>{{ value }}</p>", ext = "html")]
    struct ValueTemplate<T: fmt::Display> {
        value: T,
    }

    #[test]
    fn test_render_failure_is_a_server_error() {
        let ok = render(&ValueTemplate { value: "Ana" }).into_response();
        assert_eq!(ok.status(), StatusCode::OK);

        let failed = render(&ValueTemplate { value: Unprintable });
        assert!(matches!(failed, Err(AppError::Internal(_))));
        assert_eq!(
            failed.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_with_query_skips_empty_values() {
        assert_eq!(with_query("/clients", &[("q", "")]), "/clients");
        assert_eq!(
            with_query("/receivables", &[("status", "En Proceso"), ("q", "ana")]),
            "/receivables?status=En+Proceso&q=ana"
        );
    }
}
