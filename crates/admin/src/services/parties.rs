//! Client and supplier form checks.

use crate::api::{ClientInput, SupplierInput};
use crate::error::ValidationError;

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Trim every field and require name and national id.
///
/// # Errors
///
/// Returns a validation error for a blank name or cédula.
pub fn validate_client(input: &ClientInput) -> Result<ClientInput, ValidationError> {
    let clean = ClientInput {
        nombre: trimmed(&input.nombre),
        cedula: trimmed(&input.cedula),
        telefono: trimmed(&input.telefono),
        direccion: trimmed(&input.direccion),
        email: trimmed(&input.email),
    };
    if clean.nombre.is_empty() {
        return Err(ValidationError::new("nombre", "El nombre es obligatorio"));
    }
    if clean.cedula.is_empty() {
        return Err(ValidationError::new("cedula", "La cédula es obligatoria"));
    }
    Ok(clean)
}

/// Trim every field and require a name.
///
/// # Errors
///
/// Returns a validation error for a blank name.
pub fn validate_supplier(input: &SupplierInput) -> Result<SupplierInput, ValidationError> {
    let clean = SupplierInput {
        nombre: trimmed(&input.nombre),
        telefono: trimmed(&input.telefono),
        direccion: trimmed(&input.direccion),
        email: trimmed(&input.email),
    };
    if clean.nombre.is_empty() {
        return Err(ValidationError::new("nombre", "El nombre es obligatorio"));
    }
    Ok(clean)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_name_and_cedula() {
        let input = ClientInput {
            nombre: "Ana".to_string(),
            ..ClientInput::default()
        };
        assert_eq!(validate_client(&input).unwrap_err().field, "cedula");

        let input = ClientInput {
            nombre: " Ana Torres ".to_string(),
            cedula: "1032".to_string(),
            ..ClientInput::default()
        };
        assert_eq!(validate_client(&input).unwrap().nombre, "Ana Torres");
    }

    #[test]
    fn test_supplier_requires_name() {
        assert!(validate_supplier(&SupplierInput::default()).is_err());
    }
}
