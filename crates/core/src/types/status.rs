//! Status enums for debts, movements, closures, and gold.
//!
//! The store API is not consistent about how it encodes a debt's status: some
//! endpoints send the name (`"En Proceso"`), some a nested `{"id", "nombre"}`
//! object, and a few only the numeric id. [`DebtStatus`] decodes all three.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// DebtStatus
// =============================================================================

/// Lifecycle status of a credit or layaway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DebtStatus {
    /// Fully paid ("Finalizado", id 1).
    Finished,
    /// Cancelled and stock returned ("Cancelado", id 3).
    Cancelled,
    /// Still collecting installments ("En Proceso", id 4).
    InProgress,
    /// Deadline passed without full payment ("Caducado", id 5).
    Expired,
    /// Anything the API sends that we don't recognise. Empty when missing.
    Other(String),
    #[default]
    Unknown,
}

impl DebtStatus {
    /// Status names offered in the debt filters, in display order.
    pub const FILTERS: [&'static str; 4] = ["En Proceso", "Finalizado", "Caducado", "Cancelado"];

    /// Parse a status name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_lowercase().as_str() {
            "finalizado" => Self::Finished,
            "cancelado" => Self::Cancelled,
            "en proceso" => Self::InProgress,
            "caducado" => Self::Expired,
            "" => Self::Unknown,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Map a status id from `/dominios_comunes/estados/`.
    #[must_use]
    pub const fn from_id(id: i64) -> Self {
        match id {
            1 => Self::Finished,
            3 => Self::Cancelled,
            4 => Self::InProgress,
            5 => Self::Expired,
            _ => Self::Unknown,
        }
    }

    /// The API id, when known.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        match self {
            Self::Finished => Some(1),
            Self::Cancelled => Some(3),
            Self::InProgress => Some(4),
            Self::Expired => Some(5),
            Self::Other(_) | Self::Unknown => None,
        }
    }

    /// Canonical display name.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Finished => "Finalizado",
            Self::Cancelled => "Cancelado",
            Self::InProgress => "En Proceso",
            Self::Expired => "Caducado",
            Self::Other(name) => name,
            Self::Unknown => "",
        }
    }

    /// CSS class for the status badge.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Finished => "badge badge-finished",
            Self::Cancelled => "badge badge-cancelled",
            Self::InProgress => "badge badge-in-progress",
            Self::Expired => "badge badge-expired",
            Self::Other(_) | Self::Unknown => "badge badge-unknown",
        }
    }

    /// Whether this status has the given name, ignoring case.
    #[must_use]
    pub fn matches_filter(&self, name: &str) -> bool {
        self.label().to_lowercase() == name.trim().to_lowercase()
    }

    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("—"),
            other => f.write_str(other.label()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Name(String),
    Id(i64),
    Object {
        #[serde(default)]
        nombre: Option<String>,
        #[serde(default)]
        id: Option<i64>,
    },
}

impl<'de> Deserialize<'de> for DebtStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawStatus>::deserialize(deserializer)?;
        Ok(match raw {
            None => Self::Unknown,
            Some(RawStatus::Name(name)) => Self::from_name(&name),
            Some(RawStatus::Id(id)) => Self::from_id(id),
            Some(RawStatus::Object { nombre, id }) => match (nombre, id) {
                (Some(name), _) if !name.trim().is_empty() => Self::from_name(&name),
                (_, Some(id)) => Self::from_id(id),
                _ => Self::Unknown,
            },
        })
    }
}

impl Serialize for DebtStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// =============================================================================
// DebtKind
// =============================================================================

/// Financing mode of a debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebtKind {
    /// Goods delivered now, paid in installments.
    Credit,
    /// Goods held by the store until paid in full.
    Layaway,
}

impl DebtKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Credit => "Crédito",
            Self::Layaway => "Apartado",
        }
    }

    /// Segment used in back-office URLs (`/receivables/credit/4/pay`).
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Layaway => "layaway",
        }
    }

    /// Collection name under `/apartado_credito/`.
    #[must_use]
    pub const fn api_collection(self) -> &'static str {
        match self {
            Self::Credit => "creditos",
            Self::Layaway => "apartados",
        }
    }

    #[must_use]
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "credit" => Some(Self::Credit),
            "layaway" => Some(Self::Layaway),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "crédito" | "credito" => Some(Self::Credit),
            "apartado" => Some(Self::Layaway),
            _ => None,
        }
    }
}

impl fmt::Display for DebtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DebtKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown debt kind: {label}")))
    }
}

impl Serialize for DebtKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// =============================================================================
// MovementDirection
// =============================================================================

/// Whether a cash movement brings money in or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementDirection {
    #[serde(rename = "E")]
    Inflow,
    #[serde(rename = "S")]
    Outflow,
}

impl MovementDirection {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inflow => "Entrada",
            Self::Outflow => "Salida",
        }
    }
}

// =============================================================================
// ClosureKind
// =============================================================================

/// Period covered by a cash register closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClosureKind {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Manual,
}

impl ClosureKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Daily => "D",
            Self::Weekly => "S",
            Self::Monthly => "M",
            Self::Manual => "X",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Diario",
            Self::Weekly => "Semanal",
            Self::Monthly => "Mensual",
            Self::Manual => "Manual",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "D" => Self::Daily,
            "S" => Self::Weekly,
            "M" => Self::Monthly,
            _ => Self::Manual,
        }
    }
}

impl<'de> Deserialize<'de> for ClosureKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = Option::<String>::deserialize(deserializer)?;
        Ok(code.map_or(Self::Manual, |c| Self::from_code(&c)))
    }
}

impl Serialize for ClosureKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

// =============================================================================
// GoldKind
// =============================================================================

/// Gold grade tracked in inventory summaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GoldKind {
    Italian,
    National,
    Other(String),
}

impl GoldKind {
    /// The two grades summarised on the inventory page.
    pub const SUMMARISED: [Self; 2] = [Self::Italian, Self::National];

    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let upper = name.trim().to_uppercase();
        match upper.as_str() {
            "ITALIANO" => Self::Italian,
            "NACIONAL" => Self::National,
            _ => Self::Other(upper),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Italian => "ITALIANO",
            Self::National => "NACIONAL",
            Self::Other(name) => name,
        }
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        *self == Self::from_name(name)
    }
}

impl fmt::Display for GoldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
