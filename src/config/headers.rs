//! HTTP header constants.
//!
//! This module defines the header names and values sent with every document
//! submission.

/// Header carrying the caller's document signature
pub const SIGNATURE_HEADER: &str = "Signature";
/// Content type of submitted documents
pub const JSON_CONTENT_TYPE: &str = "application/json";
