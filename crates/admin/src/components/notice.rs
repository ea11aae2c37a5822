//! Notice banner shown at the top of a page.
//!
//! Mutations redirect with `?notice=<code>`; the code is resolved here so no
//! free text travels through the URL.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "notice notice-success",
            Self::Error => "notice notice-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// Resolve a notice code. Unknown codes show nothing.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let notice = match code {
            "client_created" => Self::success("Cliente creado correctamente"),
            "client_updated" => Self::success("Cliente actualizado correctamente"),
            "client_archived" => Self::success("Cliente archivado correctamente"),
            "client_restored" => Self::success("Cliente restaurado correctamente"),
            "supplier_created" => Self::success("Proveedor creado correctamente"),
            "supplier_updated" => Self::success("Proveedor actualizado correctamente"),
            "supplier_archived" => Self::success("Proveedor archivado correctamente"),
            "supplier_restored" => Self::success("Proveedor restaurado correctamente"),
            "garment_created" => Self::success("Prenda agregada correctamente"),
            "garment_updated" => Self::success("Prenda actualizada correctamente"),
            "garment_archived" => Self::success("Prenda archivada correctamente"),
            "garment_restored" => Self::success("Prenda restaurada correctamente"),
            "debt_cancelled" => Self::success(
                "Deuda cancelada correctamente. El inventario ha sido restaurado.",
            ),
            "register_closed" => Self::success("Caja cerrada exitosamente"),
            "sale_created" => Self::success("Venta registrada correctamente."),
            "purchase_created" => Self::success("Compra registrada correctamente"),
            "expense_created" => Self::success("Egreso registrado correctamente"),
            "income_created" => Self::success("Ingreso registrado correctamente"),
            "archive_failed" => Self::error("No se pudo archivar el registro"),
            "restore_failed" => Self::error("No se pudo restaurar el registro"),
            "cancel_failed" => Self::error("No se pudo cancelar la deuda"),
            "cancel_unconfirmed" => {
                Self::error("Marque la casilla de confirmación para cancelar la deuda")
            }
            _ => return None,
        };
        Some(notice)
    }

    #[must_use]
    pub const fn class(&self) -> &'static str {
        self.kind.class()
    }
}

/// The `notice` query parameter every page accepts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

impl NoticeQuery {
    #[must_use]
    pub fn resolve(&self) -> Option<Notice> {
        self.notice.as_deref().and_then(Notice::from_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_codes() {
        let notice = Notice::from_code("sale_created");
        assert_eq!(
            notice.map(|n| n.message),
            Some("Venta registrada correctamente.".to_string())
        );
        assert!(Notice::from_code("<script>").is_none());
        assert_eq!(
            Notice::from_code("cancel_failed").map(|n| n.kind),
            Some(NoticeKind::Error)
        );
    }
}
