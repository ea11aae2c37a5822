//! Dashboard route handler.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use tracing::instrument;

use crate::{
    components::{Notice, NoticeQuery},
    filters,
    services::dashboard::{self, Dashboard},
    state::AppState,
};

use super::{PageResult, render};

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub notice: Option<Notice>,
    pub error: Option<String>,
    pub dashboard: Dashboard,
}

/// Dashboard page handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<NoticeQuery>) -> PageResult {
    let mut dashboard = dashboard::load(state.api()).await;

    render(&DashboardTemplate {
        current_path: "/".to_string(),
        notice: query.resolve(),
        error: dashboard.error.take(),
        dashboard,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}
