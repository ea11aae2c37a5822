//! Cash register page and closing.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use httpmock::prelude::*;
use joyeria_integration_tests::TestContext;
use serde_json::json;

fn mock_register(ctx: &TestContext, closures: serde_json::Value) {
    ctx.server.mock(|when, then| {
        when.method(GET).path("/api/caja/cuentas/");
        then.status(200).json_body(json!([
            {"id": 1, "nombre": "Efectivo", "saldo_actual": "1000000"},
            {"id": 2, "nombre": "Bancolombia", "saldo_actual": "200000.50"}
        ]));
    });
    ctx.server.mock(|when, then| {
        when.method(GET)
            .path("/api/caja/movimientos/")
            .query_param("sin_cierre", "true");
        then.status(200).json_body(json!([
            {"id": 30, "fecha": "2025-03-09", "monto": "150000",
             "descripcion": "Venta #12 - Ana Torres", "venta_info": {"id": 12, "total": "150000"}}
        ]));
    });
    ctx.server.mock(|when, then| {
        when.method(GET)
            .path("/api/apartado_credito/deudas-por-cobrar-optimizado/");
        then.status(200).json_body(json!([{
            "cliente": {"id": 3, "nombre": "Ana Torres"},
            "deudas": [{"venta_id": 40, "monto_pendiente": "250000", "credito_id": 12}]
        }]));
    });
    ctx.server.mock(|when, then| {
        when.method(GET)
            .path("/api/apartado_credito/deudas-por-pagar-optimizado/");
        then.status(200).json_body(json!([{
            "proveedor": {"id": 8, "nombre": "Oro SAS"},
            "deudas": [{"compra_id": 5, "monto_pendiente": "100000", "credito_id": 2}]
        }]));
    });
    ctx.server.mock(|when, then| {
        when.method(GET).path("/api/caja/cierres/");
        then.status(200).json_body(closures);
    });
}

#[tokio::test]
async fn test_register_shows_balances_and_open_movements() {
    let ctx = TestContext::new().await;
    mock_register(&ctx, json!([]));

    let page = ctx.get("/cash").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("$1.200.000,50"));
    assert!(page.body.contains("$250.000,00"));
    assert!(page.body.contains("$100.000,00"));
    assert!(page.body.contains("$1.350.000,50"));
    assert!(page.body.contains("Bancolombia"));
    assert!(page.body.contains("Ventas"));
    assert!(page.body.contains("/cash/movements/30"));
}

#[tokio::test]
async fn test_closure_history_shows_cents() {
    let ctx = TestContext::new().await;
    mock_register(
        &ctx,
        json!([{
            "id": 4, "tipo_cierre": "X", "fecha_cierre": "2025-03-09T18:00:00",
            "total_entradas": "1500000.75", "total_salidas": "320000.25",
            "saldo_inicial": "0", "saldo_final": "1180000.50"
        }]),
    );

    let page = ctx.get("/cash").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("$1.500.000,75"));
    assert!(page.body.contains("$320.000,25"));
    assert!(page.body.contains("$1.180.000,50"));
}

#[tokio::test]
async fn test_close_without_end_date_is_rejected_locally() {
    let ctx = TestContext::new().await;
    mock_register(&ctx, json!([]));
    let close = ctx.server.mock(|when, then| {
        when.method(POST).path("/api/caja/cierres/realizar_cierre/");
        then.status(201).json_body(json!({"id": 1}));
    });

    let page = ctx
        .post_form("/cash/close", "fecha_inicio=2025-03-01&fecha_fin=")
        .await;

    close.assert_hits(0);
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Debe seleccionar una fecha de fin para cerrar la caja"));
    assert!(page.body.contains("value=\"2025-03-01\""));
}

#[tokio::test]
async fn test_close_posts_period_and_redirects() {
    let ctx = TestContext::new().await;
    let close = ctx.server.mock(|when, then| {
        when.method(POST)
            .path("/api/caja/cierres/realizar_cierre/")
            .json_body_partial(r#"{"fecha_inicio": "2025-03-01T00:00:00", "fecha_fin": "2025-03-09T23:59:59"}"#);
        then.status(201)
            .json_body(json!({"id": 4, "fecha_inicio": "2025-03-01", "fecha_fin": "2025-03-09"}));
    });

    let page = ctx
        .post_form("/cash/close", "fecha_inicio=2025-03-01&fecha_fin=2025-03-09")
        .await;

    close.assert();
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/cash?notice=register_closed"));
}

#[tokio::test]
async fn test_missing_movement_receipt_is_not_found() {
    let ctx = TestContext::new().await;
    ctx.server.mock(|when, then| {
        when.method(GET).path("/api/caja/movimientos/99/");
        then.status(404).json_body(json!({"detail": "No encontrado."}));
    });

    let page = ctx.get("/cash/movements/99").await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
}
