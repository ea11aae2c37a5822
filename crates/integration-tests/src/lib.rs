//! Integration test harness for the jewelry back-office.
//!
//! Each test starts an [`httpmock::MockServer`] standing in for the store
//! API and drives the real router with `tower::ServiceExt::oneshot`, so no
//! port is bound and no external service is needed.
//!
//! ```rust,ignore
//! let ctx = TestContext::new().await;
//! ctx.server.mock(|when, then| {
//!     when.method(GET).path("/api/terceros/clientes/");
//!     then.status(200).json_body(json!([]));
//! });
//! let page = ctx.get("/clients").await;
//! assert_eq!(page.status, StatusCode::OK);
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use httpmock::MockServer;
use joyeria_admin::config::AdminConfig;
use joyeria_admin::state::AppState;
use tower::ServiceExt;

/// A mock store API plus the router pointed at it.
pub struct TestContext {
    pub server: MockServer,
    router: Router,
}

/// A buffered response.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Page {
    /// Target of a redirect, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl TestContext {
    pub async fn new() -> Self {
        let server = MockServer::start_async().await;
        let base = server.url("/api");
        let config = AdminConfig::from_lookup(|key| match key {
            "JOYERIA_API_BASE" => Some(base.clone()),
            "JOYERIA_API_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();
        let state = AppState::new(config).unwrap();
        Self {
            server,
            router: joyeria_admin::app(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> Page {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Page {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str) -> Page {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST an already-encoded `application/x-www-form-urlencoded` body.
    pub async fn post_form(&self, uri: &str, body: &str) -> Page {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}
