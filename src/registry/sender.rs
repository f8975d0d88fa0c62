//! Document senders.
//!
//! A `DocumentSender` performs the actual network call for one submission.
//! `HttpDocumentSender` posts the document to the registry over HTTP(S).

use std::future::Future;
use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use url::Url;

use crate::config::{JSON_CONTENT_TYPE, SIGNATURE_HEADER};
use crate::error_handling::BoxError;

/// Status and body of a registry response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryResponse {
    pub status: u16,
    pub body: String,
}

impl RegistryResponse {
    /// Whether the registry accepted the document. Only `200 OK` counts.
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// Performs one document submission.
///
/// Implementations report any response they received, whatever its status,
/// and return an error only when no complete response could be obtained.
pub trait DocumentSender: Send + Sync {
    fn send_document(
        &self,
        document: Vec<u8>,
        signature: &str,
    ) -> impl Future<Output = Result<RegistryResponse, BoxError>> + Send;
}

/// Sends documents to the registry with a POST request.
///
/// Each request carries `Content-Type: application/json` and the signature in
/// the `Signature` header. Connection pooling is shared through the client.
#[derive(Debug, Clone)]
pub struct HttpDocumentSender {
    client: Arc<reqwest::Client>,
    endpoint: Url,
}

impl HttpDocumentSender {
    pub fn new(client: Arc<reqwest::Client>, endpoint: Url) -> Self {
        HttpDocumentSender { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl DocumentSender for HttpDocumentSender {
    async fn send_document(
        &self,
        document: Vec<u8>,
        signature: &str,
    ) -> Result<RegistryResponse, BoxError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(SIGNATURE_HEADER, signature)
            .body(document)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        log::debug!("Registry responded with HTTP {} ({} bytes)", status, body.len());

        Ok(RegistryResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_response_only_ok_is_success() {
        let response = |status| RegistryResponse {
            status,
            body: String::new(),
        };
        assert!(response(200).is_success());
        assert!(!response(201).is_success());
        assert!(!response(202).is_success());
        assert!(!response(204).is_success());
        assert!(!response(199).is_success());
        assert!(!response(302).is_success());
        assert!(!response(404).is_success());
        assert!(!response(500).is_success());
    }
}
