//! Credits, layaways, installments, and debt listings (`/apartado_credito/`).

use joyeria_core::{CreditId, DebtKind, LayawayId};
use tracing::instrument;

use super::ApiClient;
use crate::api::ApiError;
use crate::api::types::common::ListResponse;
use crate::api::types::{
    CancelResponse, Created, DebtDetail, DebtGroup, FinancingRef, Installment, NewFinancing,
    NewInstallment,
};

const PREFIX: &str = "apartado_credito";

fn collection_path(kind: DebtKind) -> String {
    format!("{PREFIX}/{}/", kind.api_collection())
}

impl ApiClient {
    // =========================================================================
    // Credits and layaways
    // =========================================================================

    /// Open a credit. Returns the new credit's ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, body))]
    pub async fn create_credit(&self, body: &NewFinancing) -> Result<CreditId, ApiError> {
        let created: Created = self
            .post_json(&collection_path(DebtKind::Credit), body)
            .await?;
        Ok(CreditId::new(created.id))
    }

    /// Open a layaway. Returns the new layaway's ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, body))]
    pub async fn create_layaway(&self, body: &NewFinancing) -> Result<LayawayId, ApiError> {
        let created: Created = self
            .post_json(&collection_path(DebtKind::Layaway), body)
            .await?;
        Ok(LayawayId::new(created.id))
    }

    /// Get a credit's detail.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the credit doesn't exist.
    pub async fn get_credit(&self, id: CreditId) -> Result<DebtDetail, ApiError> {
        self.get_financing(FinancingRef::Credit(id)).await
    }

    /// Get a layaway's detail.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the layaway doesn't exist.
    pub async fn get_layaway(&self, id: LayawayId) -> Result<DebtDetail, ApiError> {
        self.get_financing(FinancingRef::Layaway(id)).await
    }

    /// Get the detail of either a credit or a layaway.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the record doesn't exist.
    #[instrument(skip(self))]
    pub async fn get_financing(&self, target: FinancingRef) -> Result<DebtDetail, ApiError> {
        let path = format!("{}{}/", collection_path(target.kind()), target.id());
        self.get_json(&path, &[]).await
    }

    /// Cancel a credit. The API puts the sold garments back into stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the API refuses the cancellation.
    pub async fn cancel_credit(&self, id: CreditId) -> Result<CancelResponse, ApiError> {
        self.cancel_financing(FinancingRef::Credit(id)).await
    }

    /// Cancel a layaway. The API puts the reserved garments back into stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the API refuses the cancellation.
    pub async fn cancel_layaway(&self, id: LayawayId) -> Result<CancelResponse, ApiError> {
        self.cancel_financing(FinancingRef::Layaway(id)).await
    }

    /// Cancel either a credit or a layaway.
    ///
    /// An empty or non-JSON success body yields a response without a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the API refuses the cancellation.
    #[instrument(skip(self))]
    pub async fn cancel_financing(&self, target: FinancingRef) -> Result<CancelResponse, ApiError> {
        let path = format!(
            "{}{}/cancelar/",
            collection_path(target.kind()),
            target.id()
        );
        let text = self.post_empty(&path).await?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    // =========================================================================
    // Installments
    // =========================================================================

    /// Installments paid so far against a credit or layaway.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_installments(
        &self,
        target: FinancingRef,
    ) -> Result<Vec<Installment>, ApiError> {
        let list: ListResponse<Installment> = self
            .get_json(
                &format!("{PREFIX}/cuotas/"),
                &[(target.query_key(), target.id().to_string())],
            )
            .await?;
        Ok(list.into())
    }

    /// Record an installment payment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message when the payment is
    /// rejected (for example when it exceeds the pending balance).
    #[instrument(skip(self, body), fields(monto = %body.monto))]
    pub async fn post_installment(&self, body: &NewInstallment) -> Result<Installment, ApiError> {
        self.post_json(&format!("{PREFIX}/cuotas/"), body).await
    }

    // =========================================================================
    // Debt listings
    // =========================================================================

    /// Outstanding credits and layaways owed by clients, grouped per client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn receivables(&self) -> Result<Vec<DebtGroup>, ApiError> {
        let list: ListResponse<DebtGroup> = self
            .get_json(&format!("{PREFIX}/deudas-por-cobrar-optimizado/"), &[])
            .await?;
        Ok(list.into())
    }

    /// Outstanding credits owed to suppliers, grouped per supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn payables(&self) -> Result<Vec<DebtGroup>, ApiError> {
        let list: ListResponse<DebtGroup> = self
            .get_json(&format!("{PREFIX}/deudas-por-pagar-optimizado/"), &[])
            .await?;
        Ok(list.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use joyeria_core::PaymentMethodId;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::api::client_for_tests as client_for;

    #[tokio::test]
    async fn test_create_layaway_returns_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/apartado_credito/apartados/")
                .json_body(json!({
                    "cantidad_cuotas": 3,
                    "cuotas_pendientes": 3,
                    "estado": 4,
                    "fecha_limite": "2025-09-01"
                }));
            then.status(201).json_body(json!({"id": 17, "cantidad_cuotas": 3}));
        });

        let body = NewFinancing::layaway(3, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        let id = client_for(&server).create_layaway(&body).await.unwrap();
        mock.assert();
        assert_eq!(id, LayawayId::new(17));
    }

    #[tokio::test]
    async fn test_cancel_tolerates_empty_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/apartado_credito/creditos/12/cancelar/");
            then.status(204);
        });

        let response = client_for(&server)
            .cancel_credit(CreditId::new(12))
            .await
            .unwrap();
        assert!(response.message.is_none());
    }

    #[tokio::test]
    async fn test_cancel_returns_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/apartado_credito/apartados/4/cancelar/");
            then.status(200)
                .json_body(json!({"message": "Apartado cancelado y prendas devueltas"}));
        });

        let response = client_for(&server)
            .cancel_layaway(LayawayId::new(4))
            .await
            .unwrap();
        assert_eq!(
            response.message.as_deref(),
            Some("Apartado cancelado y prendas devueltas")
        );
    }

    #[tokio::test]
    async fn test_list_installments_filters_by_target() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/apartado_credito/cuotas/")
                .query_param("credito", "12");
            then.status(200).json_body(json!([
                {"id": 1, "fecha": "2025-05-01", "monto": "100000", "credito": 12},
                {"id": 2, "fecha": "2025-06-01", "monto": "100000", "credito": 12}
            ]));
        });

        let installments = client_for(&server)
            .list_installments(FinancingRef::Credit(CreditId::new(12)))
            .await
            .unwrap();
        assert_eq!(installments.len(), 2);
    }

    #[tokio::test]
    async fn test_post_installment_rejection_surfaces_warning() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/apartado_credito/cuotas/");
            then.status(400)
                .json_body(json!({"warning": "El abono supera el saldo pendiente"}));
        });

        let body = NewInstallment::new(
            FinancingRef::Credit(CreditId::new(12)),
            Decimal::from(999_999),
            NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
            PaymentMethodId::new(1),
        );
        let err = client_for(&server)
            .post_installment(&body)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "El abono supera el saldo pendiente");
    }

    #[tokio::test]
    async fn test_payables_decode_supplier_groups() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/apartado_credito/deudas-por-pagar-optimizado/");
            then.status(200).json_body(json!([
                {"proveedor": {"id": 2, "nombre": "Oro SAS"}, "deudas": []}
            ]));
        });

        let groups = client_for(&server).payables().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].party.nombre.as_deref(), Some("Oro SAS"));
    }

    #[tokio::test]
    async fn test_financing_detail_by_kind() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/apartado_credito/creditos/12/");
            then.status(200).json_body(json!({
                "id": 12,
                "cuotas_pendientes": 2,
                "monto_pendiente": "250000.00",
                "estado": 4,
                "estado_nombre": "En Proceso"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/apartado_credito/apartados/4/");
            then.status(404).json_body(json!({"detail": "No encontrado."}));
        });

        let client = client_for(&server);
        let credit = client.get_credit(CreditId::new(12)).await.unwrap();
        assert_eq!(credit.cuotas_pendientes, Some(2));
        assert_eq!(credit.status(), joyeria_core::DebtStatus::InProgress);

        let err = client.get_layaway(LayawayId::new(4)).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
