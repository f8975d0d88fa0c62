//! Error type definitions.
//!
//! This module defines all error types and outcome categories used throughout
//! the library.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Boxed error returned by document senders for transport faults.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configured registry endpoint is not a valid URL.
    #[error("Invalid registry endpoint '{endpoint}': {source}")]
    InvalidEndpointError {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

/// Error types for configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable is set to a value that cannot be parsed.
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Error types for rate limiter construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// The request limit is zero or negative.
    #[error("Request limit must be a positive number, got {0}")]
    InvalidLimit(i64),

    /// The window duration is zero.
    #[error("Rate limit window must be longer than zero")]
    InvalidWindow,

    /// The limiter was created outside a Tokio runtime.
    #[error("Rate limiter must be created within a Tokio runtime")]
    NoRuntime,
}

/// Error returned by `RateLimiter::acquire`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    /// The limiter was shut down before a slot was granted.
    #[error("Rate limiter shut down before a slot was granted")]
    Cancelled,
}

/// Error types for document submission.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The registry answered with a non-success status code.
    #[error("Registry rejected the document: HTTP {status}")]
    RemoteRejection { status: u16, body: String },

    /// The request could not be completed (connection refused, reset, timeout,
    /// malformed response).
    #[error("Transport failure: {0}")]
    TransportFailure(#[source] BoxError),

    /// The client was shut down while the submission waited for a slot.
    #[error("Submission cancelled: rate limiter shut down")]
    Cancelled,
}

impl From<AcquireError> for SubmitError {
    fn from(e: AcquireError) -> Self {
        match e {
            AcquireError::Cancelled => SubmitError::Cancelled,
        }
    }
}

impl SubmitError {
    /// Status code of a remote rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmitError::RemoteRejection { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Outcome category used for statistics.
    pub fn outcome_type(&self) -> OutcomeType {
        match self {
            SubmitError::RemoteRejection { .. } => OutcomeType::RemoteRejection,
            SubmitError::TransportFailure(_) => OutcomeType::TransportFailure,
            SubmitError::Cancelled => OutcomeType::Cancelled,
        }
    }
}

/// Outcome of a submission, as counted by `SubmissionStats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum OutcomeType {
    Accepted,
    RemoteRejection,
    TransportFailure,
    Cancelled,
}

impl std::fmt::Display for OutcomeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OutcomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeType::Accepted => "Accepted",
            OutcomeType::RemoteRejection => "Remote rejection",
            OutcomeType::TransportFailure => "Transport failure",
            OutcomeType::Cancelled => "Cancelled",
        }
    }
}
