//! REST client for the jewelry store API.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per process, cheap to clone (`Arc` inner)
//! - JSON over HTTP with `reqwest`; every call is a single request with no retry
//! - Lookup tables (payment methods, statuses) cached in `moka` for a few minutes
//! - Endpoint families live in their own files under `client/`, mirroring the
//!   API's URL prefixes (`/terceros/`, `/prendas/`, `/compra_venta/`, ...)
//!
//! # Example
//!
//! ```rust,ignore
//! use joyeria_admin::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let clients = client.search_clients("1032").await?;
//! let movements = client.open_movements().await?;
//! ```

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

#[cfg(test)]
pub(crate) use client::client_for_tests;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the store API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected before being sent.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Message suitable for showing inline next to a form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "El servidor no respondió a tiempo".to_string(),
            Self::Http(_) => "No se pudo conectar con el servidor".to_string(),
            Self::Parse(_) => "Respuesta inesperada del servidor".to_string(),
            Self::Status { message, .. } | Self::Validation(message) => message.clone(),
            Self::NotFound(what) => format!("No encontrado: {what}"),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
            || matches!(self, Self::Status { status, .. } if status.as_u16() == 404)
    }
}

/// Pull a human-readable message out of an error body.
///
/// The API reports failures as `{"warning": ...}`, `{"detail": ...}`,
/// `{"error": ...}`, or `{"message": ...}`, in that order of preference. Field
/// validation errors come back as a bare object which is shown compacted.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            for key in ["warning", "detail", "error", "message"] {
                match value.get(key) {
                    Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
                    Some(v) if !v.is_null() && !v.is_string() => return v.to_string(),
                    _ => {}
                }
            }
            if value.is_null() {
                format!("Error {}", status.as_u16())
            } else {
                value.to_string()
            }
        }
        Err(_) => format!("Error {}", status.as_u16()),
    }
}
