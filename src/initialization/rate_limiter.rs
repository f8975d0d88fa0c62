//! Rate limiter initialization.

use std::sync::Arc;

use crate::config::Config;
use crate::error_handling::RateLimitError;
use crate::rate_limiter::RateLimiter;

/// Initializes the fixed-window rate limiter from the configuration.
///
/// Admits `config.request_limit` requests per `config.time_unit`. Must be
/// called from within a Tokio runtime; the background window task is started
/// immediately.
///
/// # Errors
///
/// Returns `RateLimitError::InvalidLimit` if the configured limit is not
/// positive.
pub fn init_rate_limiter(config: &Config) -> Result<Arc<RateLimiter>, RateLimitError> {
    let limiter = RateLimiter::per(config.time_unit, config.request_limit)?;
    log::info!(
        "Rate limit: {} request(s) per {}",
        config.request_limit,
        config.time_unit
    );
    Ok(Arc::new(limiter))
}
