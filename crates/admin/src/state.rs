//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
}

impl AppState {
    /// Build the state, creating the store API client from the config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        Ok(Self::with_client(config, api))
    }

    /// Build the state around an existing client.
    #[must_use]
    pub fn with_client(config: AdminConfig, api: ApiClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, api }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
