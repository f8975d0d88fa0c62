//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, environment variable names)
//! - HTTP header constants
//! - Configuration types and environment parsing

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, LogFormat, LogLevel, TimeUnit};
