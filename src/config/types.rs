//! Configuration types.
//!
//! This module defines the enums and structs used to configure the registry
//! client, and how they are read from the environment.

use std::str::FromStr;
use std::time::Duration;

use strum_macros::{Display as DisplayMacro, EnumString};

use crate::config::constants::{
    DEFAULT_REGISTRY_ENDPOINT, DEFAULT_REQUEST_LIMIT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    ENV_ENDPOINT, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_REQUEST_LIMIT, ENV_TIMEOUT_SECS,
    ENV_TIME_UNIT, ENV_USER_AGENT,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, EnumString, DisplayMacro)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, EnumString, DisplayMacro)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum LogFormat {
    Plain,
    Json,
}

/// Unit of time a request limit applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, DisplayMacro)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum TimeUnit {
    #[strum(to_string = "millisecond", serialize = "milliseconds", serialize = "ms")]
    Millisecond,
    #[strum(to_string = "second", serialize = "seconds", serialize = "s")]
    Second,
    #[strum(to_string = "minute", serialize = "minutes", serialize = "m")]
    Minute,
    #[strum(to_string = "hour", serialize = "hours", serialize = "h")]
    Hour,
    #[strum(to_string = "day", serialize = "days", serialize = "d")]
    Day,
}

impl TimeUnit {
    /// Length of one unit.
    pub fn as_duration(self) -> Duration {
        match self {
            TimeUnit::Millisecond => Duration::from_millis(1),
            TimeUnit::Second => Duration::from_secs(1),
            TimeUnit::Minute => Duration::from_secs(60),
            TimeUnit::Hour => Duration::from_secs(60 * 60),
            TimeUnit::Day => Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Library configuration.
///
/// Can be built programmatically or read from `REGISTRY_*` environment
/// variables with [`Config::from_env`].
///
/// # Examples
///
/// ```no_run
/// use registry_submitter::{Config, TimeUnit};
///
/// let config = Config {
///     request_limit: 10,
///     time_unit: TimeUnit::Second,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Registry endpoint URL
    pub endpoint: String,

    /// Requests admitted per time unit
    pub request_limit: i64,

    /// Window length the request limit applies to
    pub time_unit: TimeUnit,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_REGISTRY_ENDPOINT.to_string(),
            request_limit: DEFAULT_REQUEST_LIMIT,
            time_unit: TimeUnit::Minute,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Unset variables fall back to the defaults. Call
    /// `initialization::init_env()` first to pick up a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        Ok(Config {
            endpoint: lookup(ENV_ENDPOINT).unwrap_or(defaults.endpoint),
            request_limit: parse_var(&lookup, ENV_REQUEST_LIMIT, defaults.request_limit)?,
            time_unit: parse_var(&lookup, ENV_TIME_UNIT, defaults.time_unit)?,
            timeout_seconds: parse_var(&lookup, ENV_TIMEOUT_SECS, defaults.timeout_seconds)?,
            user_agent: lookup(ENV_USER_AGENT).unwrap_or(defaults.user_agent),
            log_level: parse_var(&lookup, ENV_LOG_LEVEL, defaults.log_level)?,
            log_format: parse_var(&lookup, ENV_LOG_FORMAT, defaults.log_format)?,
        })
    }

    /// Window the request limit applies to.
    pub fn window(&self) -> Duration {
        self.time_unit.as_duration()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}
