//! Configuration constants.
//!
//! This module defines the defaults used when a setting is not provided, and
//! the environment variable names the configuration is read from.

/// Registry endpoint documents are posted to
pub const DEFAULT_REGISTRY_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

/// Default number of requests admitted per window
pub const DEFAULT_REQUEST_LIMIT: i64 = 5;

/// Per-request HTTP timeout in seconds
/// Covers connect, upload of the document and reading the response
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent string for registry requests.
pub const DEFAULT_USER_AGENT: &str = concat!("registry_submitter/", env!("CARGO_PKG_VERSION"));

// Environment variables
pub const ENV_ENDPOINT: &str = "REGISTRY_ENDPOINT";
pub const ENV_REQUEST_LIMIT: &str = "REGISTRY_REQUEST_LIMIT";
pub const ENV_TIME_UNIT: &str = "REGISTRY_TIME_UNIT";
pub const ENV_TIMEOUT_SECS: &str = "REGISTRY_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "REGISTRY_USER_AGENT";
pub const ENV_LOG_LEVEL: &str = "REGISTRY_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "REGISTRY_LOG_FORMAT";
