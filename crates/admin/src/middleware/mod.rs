//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (recorded into the span, echoed in the response)
//! 4. Security headers

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

use axum::http::{HeaderName, HeaderValue};
use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::set_header::SetResponseHeaderLayer;

type HeaderLayer = SetResponseHeaderLayer<HeaderValue>;

/// Response headers applied to every page.
///
/// The back-office only loads its own stylesheet, so the CSP allows nothing
/// external.
#[must_use]
pub fn security_headers() -> ServiceBuilder<Stack<HeaderLayer, Stack<HeaderLayer, Stack<HeaderLayer, Identity>>>> {
    ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("content-security-policy"),
            HeaderValue::from_static(
                "default-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:",
            ),
        ))
}
