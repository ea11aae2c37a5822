//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;

/// A form field that failed validation, with the message shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Form input rejected before reaching the API.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Api(ApiError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Error interno del servidor".to_string(),
            Self::Api(e) => e.user_message(),
            Self::Validation(e) => e.message.clone(),
            Self::NotFound(what) => format!("No encontrado: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("cliente 12".to_string());
        assert_eq!(err.to_string(), "Not found: cliente 12");

        let err = AppError::Validation(ValidationError::new("monto", "Ingrese un monto válido"));
        assert_eq!(err.to_string(), "Validation error: Ingrese un monto válido");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Api(ApiError::NotFound("caja/movimientos/9/".into()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Api(ApiError::Validation("x".into()))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
