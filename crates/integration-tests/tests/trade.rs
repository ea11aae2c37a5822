//! Sale and purchase forms.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use httpmock::prelude::*;
use joyeria_integration_tests::TestContext;
use serde_json::json;

fn mock_choices(ctx: &TestContext) {
    ctx.server.mock(|when, then| {
        when.method(GET).path("/api/terceros/clientes/");
        then.status(200)
            .json_body(json!([{"id": 3, "nombre": "Ana Torres", "cedula": "1032"}]));
    });
    ctx.server.mock(|when, then| {
        when.method(GET).path("/api/dominios_comunes/metodos-pago/");
        then.status(200).json_body(json!([{"id": 1, "nombre": "Efectivo"}]));
    });
    ctx.server.mock(|when, then| {
        when.method(GET).path("/api/prendas/prendas/");
        then.status(200).json_body(json!([
            {"id": 9, "nombre": "Cadena lazo", "gramos": "5", "tipo_oro_nombre": "ITALIANO", "existencia": 2},
            {"id": 10, "nombre": "Anillo agotado", "gramos": "3", "tipo_oro_nombre": "NACIONAL", "existencia": 0}
        ]));
    });
}

const LINE: &str = "cliente=3&metodo_pago=1&garment_id=9&quantity=2&price_per_gram=300000&profit_grams=1";

#[tokio::test]
async fn test_sale_form_offers_only_garments_in_stock() {
    let ctx = TestContext::new().await;
    mock_choices(&ctx);

    let page = ctx.get("/sales/new").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Cadena lazo"));
    assert!(!page.body.contains("Anillo agotado"));
}

#[tokio::test]
async fn test_preview_computes_totals_without_recording() {
    let ctx = TestContext::new().await;
    mock_choices(&ctx);
    let create = ctx.server.mock(|when, then| {
        when.method(POST).path("/api/compra_venta/ventas/");
        then.status(201).json_body(json!({"id": 50}));
    });

    let page = ctx
        .post_form("/sales", &format!("{LINE}&action=preview"))
        .await;

    create.assert_hits(0);
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("$3.000.000,00"));
    assert!(page.body.contains("$600.000,00"));
}

#[tokio::test]
async fn test_oversized_price_is_rejected_without_crashing() {
    let ctx = TestContext::new().await;
    mock_choices(&ctx);
    let create = ctx.server.mock(|when, then| {
        when.method(POST).path("/api/compra_venta/ventas/");
        then.status(201).json_body(json!({"id": 50}));
    });
    let body = "cliente=3&metodo_pago=1&garment_id=9&quantity=2\
                &price_per_gram=79228162514264337593543950335&profit_grams=1";

    let preview = ctx
        .post_form("/sales", &format!("{body}&action=preview"))
        .await;
    assert_eq!(preview.status, StatusCode::OK);

    let submit = ctx
        .post_form("/sales", &format!("{body}&action=submit"))
        .await;
    create.assert_hits(0);
    assert_eq!(submit.status, StatusCode::OK);
    assert!(submit.body.contains("Valor demasiado grande"));
}

#[tokio::test]
async fn test_sale_beyond_stock_is_rejected() {
    let ctx = TestContext::new().await;
    mock_choices(&ctx);
    let create = ctx.server.mock(|when, then| {
        when.method(POST).path("/api/compra_venta/ventas/");
        then.status(201).json_body(json!({"id": 50}));
    });

    let body = format!("{LINE}&garment_id=9&quantity=1&price_per_gram=300000&profit_grams=0&action=submit");
    let page = ctx.post_form("/sales", &body).await;

    create.assert_hits(0);
    assert!(page.body.contains("No hay suficiente existencia"));
}

#[tokio::test]
async fn test_sale_records_and_updates_stock() {
    let ctx = TestContext::new().await;
    mock_choices(&ctx);
    let create = ctx.server.mock(|when, then| {
        when.method(POST)
            .path("/api/compra_venta/ventas/")
            .json_body_partial(r#"{"cliente": 3, "metodo_pago": 1}"#);
        then.status(201).json_body(json!({"id": 50, "cliente": 3}));
    });
    let stock = ctx.server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/api/prendas/prendas/9/")
            .json_body_partial(r#"{"existencia": 0}"#);
        then.status(200).json_body(json!({"id": 9, "nombre": "Cadena lazo", "existencia": 0}));
    });

    let page = ctx
        .post_form("/sales", &format!("{LINE}&action=submit"))
        .await;

    create.assert();
    stock.assert();
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/sales/new?notice=sale_created"));
}

#[tokio::test]
async fn test_add_row_keeps_entered_lines() {
    let ctx = TestContext::new().await;
    mock_choices(&ctx);

    let page = ctx
        .post_form("/sales", &format!("{LINE}&action=add_row"))
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body.matches("name=\"garment_id\"").count(), 2);
    assert!(page.body.contains("value=\"300000\""));
}
