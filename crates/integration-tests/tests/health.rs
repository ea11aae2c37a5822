//! Health endpoints and the response middleware stack.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use httpmock::prelude::*;
use joyeria_integration_tests::TestContext;

#[tokio::test]
async fn test_liveness_does_not_touch_the_api() {
    let ctx = TestContext::new().await;
    let page = ctx.get("/health").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn test_readiness_follows_the_api() {
    let ctx = TestContext::new().await;
    let mut estados = ctx.server.mock(|when, then| {
        when.method(GET).path("/api/dominios_comunes/estados/");
        then.status(200).json_body(serde_json::json!([]));
    });
    assert_eq!(ctx.get("/health/ready").await.status, StatusCode::OK);
    estados.assert();
    estados.delete();

    ctx.server.mock(|when, then| {
        when.method(GET).path("/api/dominios_comunes/estados/");
        then.status(502);
    });
    assert_eq!(
        ctx.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let ctx = TestContext::new().await;
    let page = ctx.get("/health").await;

    let request_id = page.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(request_id.len(), 36);
    assert_eq!(page.headers.get("x-frame-options").unwrap(), "DENY");
    assert!(
        page.headers
            .get("content-security-policy")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("default-src 'self'")
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new().await;
    assert_eq!(ctx.get("/nope").await.status, StatusCode::NOT_FOUND);
}
