//! Sales, purchases, and the dashboard summary (`/compra_venta/`).

use joyeria_core::{ClientId, PurchaseId, SaleId};
use tracing::instrument;

use super::ApiClient;
use crate::api::ApiError;
use crate::api::types::common::ListResponse;
use crate::api::types::{DashboardSummary, NewPurchase, NewSale, Purchase, Sale};

const SALES: &str = "compra_venta/ventas/";
const PURCHASES: &str = "compra_venta/compras/";

impl ApiClient {
    // =========================================================================
    // Sales
    // =========================================================================

    /// List every recorded sale.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_sales(&self) -> Result<Vec<Sale>, ApiError> {
        let list: ListResponse<Sale> = self.get_json(SALES, &[]).await?;
        Ok(list.into())
    }

    /// Get a sale by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the sale doesn't exist.
    #[instrument(skip(self), fields(sale_id = %id))]
    pub async fn get_sale(&self, id: SaleId) -> Result<Sale, ApiError> {
        self.get_json(&format!("{SALES}{id}/"), &[]).await
    }

    /// Sales made to one client. A client with no sales yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(client_id = %client))]
    pub async fn sales_by_client(&self, client: ClientId) -> Result<Vec<Sale>, ApiError> {
        let found: Option<ListResponse<Sale>> = self
            .get_json_opt(
                &format!("{SALES}por-cliente-id/"),
                &[("cliente_id", client.to_string())],
            )
            .await?;
        Ok(found.map(Vec::from).unwrap_or_default())
    }

    /// Record a sale.
    ///
    /// Stock is not adjusted by this call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, sale), fields(client_id = %sale.cliente, lines = sale.prendas.len()))]
    pub async fn create_sale(&self, sale: &NewSale) -> Result<Sale, ApiError> {
        self.post_json(SALES, sale).await
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    /// List every recorded purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_purchases(&self) -> Result<Vec<Purchase>, ApiError> {
        let list: ListResponse<Purchase> = self.get_json(PURCHASES, &[]).await?;
        Ok(list.into())
    }

    /// Get a purchase by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the purchase doesn't exist.
    #[instrument(skip(self), fields(purchase_id = %id))]
    pub async fn get_purchase(&self, id: PurchaseId) -> Result<Purchase, ApiError> {
        self.get_json(&format!("{PURCHASES}{id}/"), &[]).await
    }

    /// Record a purchase.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(
        skip(self, purchase),
        fields(supplier_id = %purchase.proveedor, lines = purchase.prendas.len())
    )]
    pub async fn create_purchase(&self, purchase: &NewPurchase) -> Result<Purchase, ApiError> {
        self.post_json(PURCHASES, purchase).await
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Stock totals, average gold prices, and the sales-versus-purchases
    /// series.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.get_json("compra_venta/dashboard/resumen/", &[]).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::api::client_for_tests as client_for;

    #[tokio::test]
    async fn test_sales_by_client_404_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/compra_venta/ventas/por-cliente-id/")
                .query_param("cliente_id", "7");
            then.status(404).json_body(json!({"detail": "Sin ventas"}));
        });

        let sales = client_for(&server)
            .sales_by_client(ClientId::new(7))
            .await
            .unwrap();
        assert!(sales.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_summary_decodes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/compra_venta/dashboard/resumen/");
            then.status(200).json_body(json!({
                "stock_total": "812.40",
                "apartado_total": 15,
                "promedio_oro_nacional": "310000",
                "promedio_oro_italiano": "355000.5",
                "ventas_vs_compras": [{"fecha": "2025-05-01", "ventas": "1000", "compras": "400"}]
            }));
        });

        let summary = client_for(&server).dashboard_summary().await.unwrap();
        assert_eq!(summary.ventas_vs_compras.len(), 1);
        assert_eq!(summary.promedio_oro_nacional.format_cop(), "$310.000");
    }
}
