//! Inventory garments and their lookup tables (`/prendas/`).

use joyeria_core::GarmentId;
use tracing::instrument;

use super::ApiClient;
use crate::api::ApiError;
use crate::api::types::common::ListResponse;
use crate::api::types::{Garment, GarmentPatch, GarmentType, GoldType, NewGarment};

const GARMENTS: &str = "prendas/prendas/";

impl ApiClient {
    /// List every garment, archived ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_garments(&self) -> Result<Vec<Garment>, ApiError> {
        let list: ListResponse<Garment> = self.get_json(GARMENTS, &[]).await?;
        Ok(list.into())
    }

    /// Get a garment by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the garment doesn't exist.
    #[instrument(skip(self), fields(garment_id = %id))]
    pub async fn get_garment(&self, id: GarmentId) -> Result<Garment, ApiError> {
        self.get_json(&format!("{GARMENTS}{id}/"), &[]).await
    }

    /// Add a garment to inventory.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, garment), fields(nombre = %garment.nombre))]
    pub async fn create_garment(&self, garment: &NewGarment) -> Result<Garment, ApiError> {
        self.post_json(GARMENTS, garment).await
    }

    /// Update some fields of a garment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the API's message on validation failure.
    #[instrument(skip(self, patch), fields(garment_id = %id))]
    pub async fn patch_garment(
        &self,
        id: GarmentId,
        patch: &GarmentPatch,
    ) -> Result<Garment, ApiError> {
        self.patch_json(&format!("{GARMENTS}{id}/"), patch).await
    }

    /// Hide a garment from the active inventory.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(garment_id = %id))]
    pub async fn archive_garment(&self, id: GarmentId) -> Result<Garment, ApiError> {
        self.set_archived(id, true).await
    }

    /// Bring an archived garment back into the active inventory.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(garment_id = %id))]
    pub async fn unarchive_garment(&self, id: GarmentId) -> Result<Garment, ApiError> {
        self.set_archived(id, false).await
    }

    async fn set_archived(&self, id: GarmentId, archived: bool) -> Result<Garment, ApiError> {
        let patch = GarmentPatch {
            archivado: Some(archived),
            ..GarmentPatch::default()
        };
        self.patch_garment(id, &patch).await
    }

    /// Overwrite the units in stock of a garment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a negative stock, or an error if
    /// the API request fails.
    #[instrument(skip(self), fields(garment_id = %id))]
    pub async fn set_stock(&self, id: GarmentId, stock: i64) -> Result<Garment, ApiError> {
        if stock < 0 {
            return Err(ApiError::Validation(format!(
                "La existencia no puede ser negativa ({stock})"
            )));
        }
        let patch = GarmentPatch {
            existencia: Some(stock),
            ..GarmentPatch::default()
        };
        self.patch_garment(id, &patch).await
    }

    /// Gold grades available for new garments.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_gold_types(&self) -> Result<Vec<GoldType>, ApiError> {
        let list: ListResponse<GoldType> = self.get_json("prendas/tipos-oro/", &[]).await?;
        Ok(list.into())
    }

    /// Garment categories available for new garments.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_garment_types(&self) -> Result<Vec<GarmentType>, ApiError> {
        let list: ListResponse<GarmentType> =
            self.get_json("prendas/tipos-prenda/", &[]).await?;
        Ok(list.into())
    }
}
