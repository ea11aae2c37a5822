//! Client pages against a mock store API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use httpmock::prelude::*;
use joyeria_integration_tests::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_list_shows_active_clients_and_notice() {
    let ctx = TestContext::new().await;
    let list = ctx.server.mock(|when, then| {
        when.method(GET)
            .path("/api/terceros/clientes/")
            .query_param("archivado", "false");
        then.status(200).json_body(json!([
            {"id": 1, "nombre": "Ana Torres", "cedula": "1032", "telefono": "3001234567"},
            {"id": 2, "nombre": "Luis Pérez", "cedula": "2040"}
        ]));
    });

    let page = ctx.get("/clients?notice=client_created").await;

    list.assert();
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Ana Torres"));
    assert!(page.body.contains("3001234567"));
    assert!(page.body.contains("Cliente creado correctamente"));
}

#[tokio::test]
async fn test_numeric_search_uses_document_lookup() {
    let ctx = TestContext::new().await;
    let lookup = ctx.server.mock(|when, then| {
        when.method(GET)
            .path("/api/terceros/clientes/buscar_por_cedula/")
            .query_param("cedula", "1032");
        then.status(200)
            .json_body(json!({"id": 1, "nombre": "Ana Torres", "cedula": "1032"}));
    });

    let page = ctx.get("/clients?q=1032").await;

    lookup.assert();
    assert!(page.body.contains("Ana Torres"));
}

#[tokio::test]
async fn test_search_without_match_renders_empty_state() {
    let ctx = TestContext::new().await;
    ctx.server.mock(|when, then| {
        when.method(GET).path("/api/terceros/clientes/buscar_por_nombre/");
        then.status(404).json_body(json!({"detail": "No encontrado"}));
    });

    let page = ctx.get("/clients?q=zoe").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No se encontraron clientes."));
}

#[tokio::test]
async fn test_create_redirects_with_notice() {
    let ctx = TestContext::new().await;
    let create = ctx.server.mock(|when, then| {
        when.method(POST)
            .path("/api/terceros/clientes/")
            .json_body_partial(r#"{"nombre": "Ana Torres", "cedula": "1032"}"#);
        then.status(201)
            .json_body(json!({"id": 9, "nombre": "Ana Torres", "cedula": "1032"}));
    });

    let page = ctx
        .post_form("/clients", "nombre=+Ana+Torres+&cedula=1032&telefono=&direccion=&email=")
        .await;

    create.assert();
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/clients?notice=client_created"));
}

#[tokio::test]
async fn test_create_without_document_stays_on_form() {
    let ctx = TestContext::new().await;
    let create = ctx.server.mock(|when, then| {
        when.method(POST).path("/api/terceros/clientes/");
        then.status(201).json_body(json!({"id": 9, "nombre": "x"}));
    });

    let page = ctx.post_form("/clients", "nombre=Ana&cedula=++").await;

    create.assert_hits(0);
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("La cédula es obligatoria"));
    assert!(page.body.contains("value=\"Ana\""));
}

#[tokio::test]
async fn test_api_rejection_message_is_shown() {
    let ctx = TestContext::new().await;
    ctx.server.mock(|when, then| {
        when.method(POST).path("/api/terceros/clientes/");
        then.status(400)
            .json_body(json!({"cedula": ["Ya existe un cliente con esta cédula."]}));
    });

    let page = ctx.post_form("/clients", "nombre=Ana&cedula=1032").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Ya existe un cliente con esta cédula."));
}
