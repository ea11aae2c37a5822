//! Clients and suppliers (`/terceros/`).

use joyeria_core::{ClientId, SupplierId};
use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use crate::api::ApiError;
use crate::api::types::common::{ListResponse, OneOrMany};
use crate::api::types::{Client, ClientInput, Supplier, SupplierInput};

const CLIENTS: &str = "terceros/clientes/";
const SUPPLIERS: &str = "terceros/proveedores/";

impl ApiClient {
    // =========================================================================
    // Clients
    // =========================================================================

    /// List clients, either active or archived.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_clients(&self, archived: bool) -> Result<Vec<Client>, ApiError> {
        let list: ListResponse<Client> = self
            .get_json(CLIENTS, &[("archivado", archived.to_string())])
            .await?;
        Ok(list.into())
    }

    /// Get a client by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the client doesn't exist.
    #[instrument(skip(self), fields(client_id = %id))]
    pub async fn get_client(&self, id: ClientId) -> Result<Client, ApiError> {
        self.get_json(&format!("{CLIENTS}{id}/"), &[]).await
    }

    /// Search clients by document number or by name.
    ///
    /// An all-digit term searches by document number, anything else by name.
    /// An empty term returns every active client. No match is an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_clients(&self, term: &str) -> Result<Vec<Client>, ApiError> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_clients(false).await;
        }

        let (path, query) = if term.chars().all(|c| c.is_ascii_digit()) {
            (format!("{CLIENTS}buscar_por_cedula/"), ("cedula", term))
        } else {
            (format!("{CLIENTS}buscar_por_nombre/"), ("nombre", term))
        };

        let found: Option<OneOrMany<Client>> = self
            .get_json_opt(&path, &[(query.0, query.1.to_string())])
            .await?;
        Ok(found.map(Vec::from).unwrap_or_default())
    }

    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, input), fields(nombre = %input.nombre))]
    pub async fn create_client(&self, input: &ClientInput) -> Result<Client, ApiError> {
        self.post_json(CLIENTS, input).await
    }

    /// Replace a client's fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, input), fields(client_id = %id))]
    pub async fn update_client(
        &self,
        id: ClientId,
        input: &ClientInput,
    ) -> Result<Client, ApiError> {
        self.put_json(&format!("{CLIENTS}{id}/"), input).await
    }

    /// Archive a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(client_id = %id))]
    pub async fn archive_client(&self, id: ClientId) -> Result<(), ApiError> {
        self.send_ignoring_body::<()>(Method::PATCH, &format!("{CLIENTS}{id}/archivar/"), None)
            .await
    }

    /// Restore an archived client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(client_id = %id))]
    pub async fn unarchive_client(&self, id: ClientId) -> Result<(), ApiError> {
        self.send_ignoring_body::<()>(
            Method::PATCH,
            &format!("{CLIENTS}{id}/desarchivar/"),
            None,
        )
        .await
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    /// List suppliers, either active or archived.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_suppliers(&self, archived: bool) -> Result<Vec<Supplier>, ApiError> {
        let list: ListResponse<Supplier> = self
            .get_json(SUPPLIERS, &[("archivado", archived.to_string())])
            .await?;
        Ok(list.into())
    }

    /// Get a supplier by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the supplier doesn't exist.
    #[instrument(skip(self), fields(supplier_id = %id))]
    pub async fn get_supplier(&self, id: SupplierId) -> Result<Supplier, ApiError> {
        self.get_json(&format!("{SUPPLIERS}{id}/"), &[]).await
    }

    /// Search suppliers by name. An empty term lists every active supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_suppliers(&self, term: &str) -> Result<Vec<Supplier>, ApiError> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_suppliers(false).await;
        }

        let found: Option<OneOrMany<Supplier>> = self
            .get_json_opt(
                &format!("{SUPPLIERS}buscar_por_nombre/"),
                &[("nombre", term.to_string())],
            )
            .await?;
        Ok(found.map(Vec::from).unwrap_or_default())
    }

    /// Create a supplier.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, input), fields(nombre = %input.nombre))]
    pub async fn create_supplier(&self, input: &SupplierInput) -> Result<Supplier, ApiError> {
        self.post_json(SUPPLIERS, input).await
    }

    /// Replace a supplier's fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, input), fields(supplier_id = %id))]
    pub async fn update_supplier(
        &self,
        id: SupplierId,
        input: &SupplierInput,
    ) -> Result<Supplier, ApiError> {
        self.put_json(&format!("{SUPPLIERS}{id}/"), input).await
    }

    /// Archive a supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(supplier_id = %id))]
    pub async fn archive_supplier(&self, id: SupplierId) -> Result<(), ApiError> {
        self.send_ignoring_body::<()>(
            Method::PATCH,
            &format!("{SUPPLIERS}{id}/archivar/"),
            None,
        )
        .await
    }

    /// Restore an archived supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(supplier_id = %id))]
    pub async fn unarchive_supplier(&self, id: SupplierId) -> Result<(), ApiError> {
        self.send_ignoring_body::<()>(
            Method::PATCH,
            &format!("{SUPPLIERS}{id}/desarchivar/"),
            None,
        )
        .await
    }
}
