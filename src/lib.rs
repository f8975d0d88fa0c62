//! registry_submitter library: rate-limited document submission
//!
//! This library submits documents to a remote registry over HTTP while never
//! starting more than N requests per fixed window. Any number of tasks may
//! submit concurrently; callers over the limit wait in arrival order instead
//! of being rejected.
//!
//! # Example
//!
//! ```no_run
//! use registry_submitter::initialization::init_registry_client;
//! use registry_submitter::{Config, TimeUnit};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config {
//!     request_limit: 5,
//!     time_unit: TimeUnit::Minute,
//!     ..Default::default()
//! };
//!
//! let client = init_registry_client(&config)?;
//! let response = client
//!     .submit(r#"{"doc_id":"doc123","doc_status":"NEW"}"#, "signature")
//!     .await?;
//! println!("Registry answered HTTP {}", response.status);
//!
//! client.shutdown_gracefully().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime: the rate limiter runs its window
//! resetter as a background task.

pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod rate_limiter;
pub mod registry;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, TimeUnit};
pub use error_handling::{
    AcquireError, BoxError, ConfigError, InitializationError, OutcomeType, RateLimitError,
    SubmissionStats, SubmitError,
};
pub use rate_limiter::{RateLimiter, SlotGuard};
pub use registry::{DocumentSender, HttpDocumentSender, RegistryClient, RegistryResponse};
