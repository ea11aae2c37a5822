//! Report commands.

pub mod cash;
pub mod debts;
pub mod inventory;

use joyeria_admin::api::{ApiClient, ApiError};
use joyeria_admin::config::{ApiConfig, ConfigError};
use thiserror::Error;

/// Errors that can occur while running a report.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store API error: {0}")]
    Api(#[from] ApiError),
}

/// Build an API client from the environment.
///
/// # Errors
///
/// Returns an error if the API settings are invalid or the HTTP client
/// cannot be built.
pub fn connect() -> Result<ApiClient, CliError> {
    let config = ApiConfig::from_env()?;
    tracing::info!(api = %config.base_url, "Using store API");
    Ok(ApiClient::new(&config)?)
}

/// Write a finished report to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(report: &str) {
    print!("{report}");
}
