//! Rate-limited registry client.

use std::sync::Arc;

use crate::error_handling::{log_submission_statistics, OutcomeType, SubmissionStats, SubmitError};
use crate::rate_limiter::RateLimiter;

use super::sender::{DocumentSender, HttpDocumentSender, RegistryResponse};

/// Submits documents through a `DocumentSender` without exceeding the rate
/// enforced by a shared `RateLimiter`.
///
/// `submit` may be called concurrently from any number of tasks. Callers over
/// the limit wait for a slot instead of being rejected. No retries are made;
/// failures are returned to the caller unchanged.
pub struct RegistryClient<S = HttpDocumentSender> {
    limiter: Arc<RateLimiter>,
    sender: S,
    stats: Arc<SubmissionStats>,
}

impl<S: DocumentSender> RegistryClient<S> {
    pub fn new(limiter: Arc<RateLimiter>, sender: S) -> Self {
        RegistryClient {
            limiter,
            sender,
            stats: Arc::new(SubmissionStats::new()),
        }
    }

    /// Submits one document.
    ///
    /// Waits for a rate limiter slot, sends the document, and releases the
    /// slot on every exit path, including when this future is dropped.
    ///
    /// # Errors
    ///
    /// - `SubmitError::RemoteRejection` if the registry answers with a status other than 200 OK
    /// - `SubmitError::TransportFailure` if no complete response was received
    /// - `SubmitError::Cancelled` if the client was shut down while waiting for a slot
    pub async fn submit(
        &self,
        document: impl Into<Vec<u8>>,
        signature: &str,
    ) -> Result<RegistryResponse, SubmitError> {
        let result = self.submit_inner(document.into(), signature).await;
        match &result {
            Ok(_) => self.stats.increment(OutcomeType::Accepted),
            Err(e) => self.stats.increment(e.outcome_type()),
        }
        result
    }

    async fn submit_inner(
        &self,
        document: Vec<u8>,
        signature: &str,
    ) -> Result<RegistryResponse, SubmitError> {
        let _slot = self.limiter.acquire().await?;

        let response = self
            .sender
            .send_document(document, signature)
            .await
            .map_err(|e| {
                log::warn!("Document submission failed: {}", e);
                SubmitError::TransportFailure(e)
            })?;

        if !response.is_success() {
            log::warn!("Registry rejected document: HTTP {}", response.status);
            return Err(SubmitError::RemoteRejection {
                status: response.status,
                body: response.body,
            });
        }

        Ok(response)
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub fn stats(&self) -> &SubmissionStats {
        &self.stats
    }

    /// Stops the rate limiter. Submissions still waiting for a slot fail with
    /// `SubmitError::Cancelled`; submissions already sending are unaffected.
    pub fn shutdown(&self) {
        self.limiter.shutdown();
    }

    /// Shuts down, waits for the background window task and logs statistics.
    pub async fn shutdown_gracefully(&self) {
        self.limiter.shutdown_gracefully().await;
        log_submission_statistics(&self.stats);
    }
}

impl<S> std::fmt::Debug for RegistryClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("limiter", &self.limiter)
            .field("submitted", &self.stats.total())
            .field("failed", &self.stats.total_failures())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::error_handling::BoxError;

    struct RecordingSender {
        status: u16,
        calls: Mutex<Vec<(Vec<u8>, String)>>,
    }

    impl RecordingSender {
        fn new(status: u16) -> Self {
            RecordingSender {
                status,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl DocumentSender for RecordingSender {
        async fn send_document(
            &self,
            document: Vec<u8>,
            signature: &str,
        ) -> Result<RegistryResponse, BoxError> {
            self.calls
                .lock()
                .unwrap()
                .push((document, signature.to_string()));
            Ok(RegistryResponse {
                status: self.status,
                body: "{}".to_string(),
            })
        }
    }

    struct FailingSender {
        calls: AtomicUsize,
    }

    impl DocumentSender for FailingSender {
        async fn send_document(
            &self,
            _document: Vec<u8>,
            _signature: &str,
        ) -> Result<RegistryResponse, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )))
        }
    }

    fn limiter(limit: i64) -> Arc<RateLimiter> {
        Arc::new(RateLimiter::new(Duration::from_secs(60), limit).unwrap())
    }

    #[tokio::test]
    async fn test_submit_passes_document_and_signature() {
        let client = RegistryClient::new(limiter(2), RecordingSender::new(200));
        let response = client.submit(r#"{"doc_id":"doc123"}"#, "sig").await.unwrap();

        assert_eq!(response.status, 200);
        let calls = client.sender().calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, br#"{"doc_id":"doc123"}"#.to_vec());
        assert_eq!(calls[0].1, "sig");
        assert_eq!(client.stats().get_count(OutcomeType::Accepted), 1);
        assert_eq!(client.limiter().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_rejection_releases_slot() {
        let client = RegistryClient::new(limiter(2), RecordingSender::new(500));
        let err = client.submit("{}", "sig").await.unwrap_err();

        assert!(matches!(err, SubmitError::RemoteRejection { status: 500, .. }));
        assert_eq!(client.limiter().in_flight(), 0);
        assert_eq!(client.stats().get_count(OutcomeType::RemoteRejection), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_releases_slot() {
        let sender = FailingSender {
            calls: AtomicUsize::new(0),
        };
        let client = RegistryClient::new(limiter(2), sender);
        let err = client.submit("{}", "sig").await.unwrap_err();

        assert!(matches!(err, SubmitError::TransportFailure(_)));
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(client.limiter().in_flight(), 0);
        assert_eq!(client.sender().calls.load(Ordering::SeqCst), 1, "no retries");

        // The second admission of this window goes through straight away.
        let next = tokio::time::timeout(Duration::from_millis(100), client.limiter().acquire())
            .await
            .expect("slot should be free again")
            .unwrap();
        assert_eq!(client.limiter().in_flight(), 1);
        drop(next);
    }

    #[tokio::test]
    async fn test_debug_shows_limiter_and_counts() {
        let client = RegistryClient::new(limiter(3), RecordingSender::new(200));
        client.submit("{}", "sig").await.unwrap();

        let rendered = format!("{:?}", client);
        assert!(rendered.starts_with("RegistryClient"));
        assert!(rendered.contains("capacity: 3"));
        assert!(rendered.contains("submitted: 1"));
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_cancelled() {
        let client = RegistryClient::new(limiter(1), RecordingSender::new(200));
        client.shutdown();
        client.shutdown();

        let err = client.submit("{}", "sig").await.unwrap_err();
        assert!(matches!(err, SubmitError::Cancelled));
        assert!(client.sender().calls.lock().unwrap().is_empty());
        assert_eq!(client.stats().get_count(OutcomeType::Cancelled), 1);
    }
}
