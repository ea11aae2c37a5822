//! Cash register (`/caja/`).

use joyeria_core::MovementId;
use tracing::instrument;

use super::ApiClient;
use crate::api::ApiError;
use crate::api::types::common::ListResponse;
use crate::api::types::{Account, CloseRegister, Closure, Movement};

impl ApiClient {
    /// Money accounts with their current balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        let list: ListResponse<Account> = self.get_json("caja/cuentas/", &[]).await?;
        Ok(list.into())
    }

    /// Movements not yet included in any closure.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn open_movements(&self) -> Result<Vec<Movement>, ApiError> {
        let list: ListResponse<Movement> = self
            .get_json("caja/movimientos/", &[("sin_cierre", "true".to_string())])
            .await?;
        Ok(list.into())
    }

    /// A single movement with its origin attached.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the movement doesn't exist.
    #[instrument(skip(self), fields(movement_id = %id))]
    pub async fn get_movement(&self, id: MovementId) -> Result<Movement, ApiError> {
        self.get_json(&format!("caja/movimientos/{id}/"), &[]).await
    }

    /// Past closures, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_closures(&self) -> Result<Vec<Closure>, ApiError> {
        let list: ListResponse<Closure> = self.get_json("caja/cierres/", &[]).await?;
        Ok(list.into())
    }

    /// Close the register for a period.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message if the closure is
    /// rejected.
    #[instrument(skip(self, request), fields(fecha_fin = %request.fecha_fin))]
    pub async fn close_register(&self, request: &CloseRegister) -> Result<Closure, ApiError> {
        self.post_json("caja/cierres/realizar_cierre/", request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use joyeria_core::ClosureKind;
    use serde_json::json;

    use super::*;
    use crate::api::client_for_tests as client_for;

    #[tokio::test]
    async fn test_open_movements_requests_unclosed_only() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/caja/movimientos/")
                .query_param("sin_cierre", "true");
            then.status(200).json_body(json!([
                {"id": 1, "monto": "1000", "tipo_movimiento": {"nombre": "Venta", "tipo": "E"}}
            ]));
        });

        let movements = client_for(&server).open_movements().await.unwrap();
        mock.assert();
        assert_eq!(movements.len(), 1);
    }

    #[tokio::test]
    async fn test_close_register_posts_period() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/caja/cierres/realizar_cierre/")
                .json_body(json!({
                    "tipo_cierre": "D",
                    "fecha_inicio": "2025-05-01T00:00:00",
                    "fecha_fin": "2025-05-02T23:59:59",
                    "observaciones": "Cierre manual desde el panel",
                    "cerrado_por": "Usuario"
                }));
            then.status(201).json_body(json!({
                "id": 30,
                "tipo_cierre": "D",
                "total_entradas": "1500000",
                "total_salidas": "200000"
            }));
        });

        let request = CloseRegister {
            tipo_cierre: ClosureKind::Daily,
            fecha_inicio: "2025-05-01T00:00:00".to_string(),
            fecha_fin: "2025-05-02T23:59:59".to_string(),
            observaciones: "Cierre manual desde el panel".to_string(),
            cerrado_por: "Usuario".to_string(),
        };
        let closure = client_for(&server).close_register(&request).await.unwrap();
        mock.assert();
        assert_eq!(closure.profit().format_cop(), "$1.300.000");
    }
}
