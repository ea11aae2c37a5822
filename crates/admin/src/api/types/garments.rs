//! Inventory garments (`/prendas/`).

use joyeria_core::{GarmentId, GarmentTypeId, GoldKind, GoldTypeId, Grams};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{id_or_object, null_as_default};

/// A garment ("prenda") held in inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Garment {
    pub id: GarmentId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
    /// Weight of one unit.
    #[serde(default, deserialize_with = "null_as_default")]
    pub gramos: Grams,
    #[serde(default, deserialize_with = "id_or_object")]
    pub tipo_oro: Option<GoldTypeId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tipo_oro_nombre: String,
    #[serde(default, deserialize_with = "id_or_object")]
    pub tipo_prenda: Option<GarmentTypeId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tipo_prenda_nombre: String,
    /// Units in stock.
    #[serde(default, deserialize_with = "null_as_default")]
    pub existencia: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub es_chatarra: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub es_recuperable: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub archivado: bool,
}

impl Garment {
    /// Grams on hand: unit weight times stock.
    #[must_use]
    pub fn stock_grams(&self) -> Grams {
        self.gramos * self.existencia
    }

    #[must_use]
    pub fn gold_kind(&self) -> GoldKind {
        GoldKind::from_name(&self.tipo_oro_nombre)
    }

    /// Neither scrap nor recoverable.
    #[must_use]
    pub const fn is_regular(&self) -> bool {
        !self.es_chatarra && !self.es_recuperable
    }
}

/// Body for creating a garment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGarment {
    pub nombre: String,
    pub gramos: Decimal,
    pub tipo_oro: GoldTypeId,
    pub tipo_prenda: GarmentTypeId,
    pub existencia: i64,
    pub es_chatarra: bool,
    pub es_recuperable: bool,
}

/// Partial update for a garment. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GarmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gramos: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existencia: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub es_chatarra: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub es_recuperable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archivado: Option<bool>,
}

/// Gold grade lookup row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldType {
    pub id: GoldTypeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
}

/// Garment category lookup row (ring, chain, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarmentType {
    pub id: GarmentTypeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_garment_decodes_api_shape() {
        let json = r#"{
            "id": 9,
            "nombre": "Cadena lazo",
            "gramos": "4.50",
            "tipo_oro": 1,
            "tipo_oro_nombre": "ITALIANO",
            "tipo_prenda": 2,
            "tipo_prenda_nombre": "Cadena",
            "existencia": 3,
            "es_chatarra": false,
            "es_recuperable": false,
            "archivado": false
        }"#;
        let garment: Garment = serde_json::from_str(json).unwrap();
        assert_eq!(garment.gold_kind(), GoldKind::Italian);
        assert_eq!(
            garment.stock_grams(),
            Grams::new(Decimal::from_str("13.5").unwrap())
        );
        assert!(garment.is_regular());
    }

    #[test]
    fn test_garment_patch_skips_unset_fields() {
        let patch = GarmentPatch {
            archivado: Some(true),
            ..GarmentPatch::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"archivado":true}"#
        );
    }
}
