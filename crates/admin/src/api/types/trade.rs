//! Sales, purchases, and the dashboard summary (`/compra_venta/`).

use joyeria_core::{
    ClientId, CreditId, GarmentId, Grams, LayawayId, Money, PaymentMethodId, PurchaseId, SaleId,
    SupplierId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{id_or_object, lenient_text, null_as_default};

/// One garment line on a recorded sale or purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "id_or_object")]
    pub prenda: Option<GarmentId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub prenda_nombre: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cantidad: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtotal_gramos: Grams,
}

/// A recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    #[serde(default, deserialize_with = "id_or_object")]
    pub cliente: Option<ClientId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cliente_nombre: Option<String>,
    #[serde(default, deserialize_with = "id_or_object")]
    pub credito: Option<CreditId>,
    #[serde(default, deserialize_with = "id_or_object")]
    pub apartado: Option<LayawayId>,
    #[serde(default, deserialize_with = "id_or_object")]
    pub metodo_pago: Option<PaymentMethodId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prendas: Vec<TradeItem>,
}

/// A recorded purchase from a supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    #[serde(default, deserialize_with = "id_or_object")]
    pub proveedor: Option<SupplierId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub proveedor_nombre: Option<String>,
    #[serde(default, deserialize_with = "id_or_object")]
    pub credito: Option<CreditId>,
    #[serde(default, deserialize_with = "id_or_object")]
    pub metodo_pago: Option<PaymentMethodId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prendas: Vec<TradeItem>,
}

/// Line of a new sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSaleLine {
    pub prenda: GarmentId,
    pub cantidad: i64,
    pub precio_por_gramo: Decimal,
    pub gramo_ganancia: Decimal,
}

/// Body for `POST /compra_venta/ventas/`.
///
/// `credito` and `apartado` are sent as `null` when unused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSale {
    pub cliente: ClientId,
    pub descripcion: String,
    pub metodo_pago: PaymentMethodId,
    pub credito: Option<CreditId>,
    pub apartado: Option<LayawayId>,
    pub prendas: Vec<NewSaleLine>,
}

/// Line of a new purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPurchaseLine {
    pub prenda: GarmentId,
    pub cantidad: i64,
    pub precio_por_gramo: Decimal,
}

/// Body for `POST /compra_venta/compras/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPurchase {
    pub proveedor: SupplierId,
    pub metodo_pago: PaymentMethodId,
    pub descripcion: String,
    pub prendas: Vec<NewPurchaseLine>,
}

/// One day of the sales-versus-purchases series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fecha: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ventas: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub compras: Money,
}

/// Body of `GET /compra_venta/dashboard/resumen/`. Missing figures are zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock_total: Grams,
    #[serde(default, deserialize_with = "null_as_default")]
    pub apartado_total: Grams,
    #[serde(default, deserialize_with = "null_as_default")]
    pub promedio_oro_nacional: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub promedio_oro_italiano: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ventas_vs_compras: Vec<TradePoint>,
}
