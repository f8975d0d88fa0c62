//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - Environment (`.env` file)
//! - Logger
//! - HTTP client
//! - Rate limiter
//! - The registry client tying them together

mod client;
mod logger;
mod rate_limiter;

use anyhow::{Context, Result};
use url::Url;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::registry::{HttpDocumentSender, RegistryClient};

// Re-export public API
pub use client::init_client;
pub use logger::{init_logger_from_config, init_logger_with};
pub use rate_limiter::init_rate_limiter;

/// Loads environment variables from a `.env` file, if there is one.
///
/// Looks in the current directory first, then next to the executable.
/// Variables already set in the process environment are not overwritten.
pub fn init_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let env_path = exe_dir.join(".env");
            if env_path.exists() {
                if let Err(e) = dotenvy::from_path(&env_path) {
                    log::warn!("Failed to load {}: {}", env_path.display(), e);
                }
            }
        }
    }
}

/// Parses the configured registry endpoint.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, InitializationError> {
    Url::parse(endpoint).map_err(|source| InitializationError::InvalidEndpointError {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Builds a ready-to-use registry client from the configuration.
///
/// Creates the HTTP client, the rate limiter (whose window task starts
/// immediately) and the HTTP document sender. Must be called from within a
/// Tokio runtime.
///
/// # Errors
///
/// Returns an error if the endpoint is not a valid URL, the HTTP client
/// cannot be built, or the request limit is not positive.
pub fn init_registry_client(config: &Config) -> Result<RegistryClient<HttpDocumentSender>> {
    let endpoint = parse_endpoint(&config.endpoint).context("Failed to parse registry endpoint")?;
    let client = init_client(config)
        .map_err(InitializationError::from)
        .context("Failed to initialize HTTP client")?;
    let limiter = init_rate_limiter(config).context("Failed to initialize rate limiter")?;

    log::debug!("Submitting documents to {}", endpoint);
    Ok(RegistryClient::new(
        limiter,
        HttpDocumentSender::new(client, endpoint),
    ))
}
