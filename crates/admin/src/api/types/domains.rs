//! Shared lookup tables (`/dominios_comunes/`).

use joyeria_core::{PaymentMethodId, StatusId};
use serde::{Deserialize, Serialize};

use super::common::null_as_default;

/// A payment method (cash, transfer, card, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
}

/// A status row as configured in the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: StatusId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
}
