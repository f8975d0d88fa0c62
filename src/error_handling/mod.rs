//! Error handling and submission statistics.
//!
//! This module provides:
//! - Error type definitions for initialization, configuration, rate limiting
//!   and submission
//! - Submission outcome statistics

mod stats;
mod types;

// Re-export public API
pub use stats::{log_submission_statistics, SubmissionStats};
pub use types::{
    AcquireError, BoxError, ConfigError, InitializationError, OutcomeType, RateLimitError,
    SubmitError,
};
