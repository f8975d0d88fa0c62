//! Document submission to the remote registry.
//!
//! - `sender`: the network boundary (`DocumentSender`) and its HTTP implementation
//! - `client`: `RegistryClient`, which wraps a sender with the rate limiter

mod client;
mod sender;

pub use client::RegistryClient;
pub use sender::{DocumentSender, HttpDocumentSender, RegistryResponse};
