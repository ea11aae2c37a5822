//! Clients and suppliers (`/terceros/`).

use joyeria_core::{ClientId, SupplierId};
use serde::{Deserialize, Serialize};

use super::common::{lenient_text, null_as_default};

/// A store client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
    /// National ID number.
    #[serde(default, deserialize_with = "lenient_text")]
    pub cedula: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub telefono: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub direccion: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub archivado: bool,
}

/// Body for creating or replacing a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInput {
    pub nombre: String,
    pub cedula: String,
    pub telefono: String,
    pub direccion: String,
    pub email: String,
}

impl From<&Client> for ClientInput {
    fn from(client: &Client) -> Self {
        Self {
            nombre: client.nombre.clone(),
            cedula: client.cedula.clone().unwrap_or_default(),
            telefono: client.telefono.clone().unwrap_or_default(),
            direccion: client.direccion.clone().unwrap_or_default(),
            email: client.email.clone().unwrap_or_default(),
        }
    }
}

/// A gold supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub telefono: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub direccion: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub archivado: bool,
}

/// Body for creating or replacing a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierInput {
    pub nombre: String,
    pub telefono: String,
    pub direccion: String,
    pub email: String,
}

impl From<&Supplier> for SupplierInput {
    fn from(supplier: &Supplier) -> Self {
        Self {
            nombre: supplier.nombre.clone(),
            telefono: supplier.telefono.clone().unwrap_or_default(),
            direccion: supplier.direccion.clone().unwrap_or_default(),
            email: supplier.email.clone().unwrap_or_default(),
        }
    }
}

/// The party attached to a debt group.
///
/// Receivables carry a client and payables a supplier; older records may use
/// `razon_social` or split `nombres`/`apellidos` instead of `nombre`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtParty {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub razon_social: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub nombres: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub apellidos: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cedula: Option<String>,
}

impl From<&Client> for DebtParty {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id.as_i64(),
            nombre: Some(client.nombre.clone()).filter(|n| !n.is_empty()),
            cedula: client.cedula.clone(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_decodes_numeric_cedula_and_nulls() {
        let json = r#"{
            "id": 3,
            "nombre": "Ana Torres",
            "cedula": 1032456789,
            "telefono": null,
            "direccion": "",
            "email": "ana@correo.co"
        }"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.id, ClientId::new(3));
        assert_eq!(client.cedula.as_deref(), Some("1032456789"));
        assert!(client.telefono.is_none());
        assert!(client.direccion.is_none());
        assert!(!client.archivado);
    }

    #[test]
    fn test_client_input_from_client() {
        let client: Client =
            serde_json::from_str(r#"{"id":1,"nombre":"Luis","cedula":"77"}"#).unwrap();
        let input = ClientInput::from(&client);
        assert_eq!(input.nombre, "Luis");
        assert_eq!(input.cedula, "77");
        assert_eq!(input.email, "");
    }
}
