// Shared test helpers: document senders with controllable behavior.
//
// This module is included by the integration test files with `mod helpers;`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use registry_submitter::{BoxError, DocumentSender, RegistryResponse};
use tokio::sync::Semaphore;

/// Sender whose requests stay "on the wire" until the test lets them finish.
pub struct HoldingSender {
    started: AtomicUsize,
    finished: AtomicUsize,
    release: Semaphore,
}

#[allow(dead_code)] // Used by other test files
impl HoldingSender {
    pub fn new() -> Self {
        HoldingSender {
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            release: Semaphore::new(0),
        }
    }

    /// Lets `n` held requests complete.
    pub fn finish(&self, n: usize) {
        self.release.add_permits(n);
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl DocumentSender for HoldingSender {
    async fn send_document(
        &self,
        _document: Vec<u8>,
        _signature: &str,
    ) -> Result<RegistryResponse, BoxError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.release.acquire().await?.forget();
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(RegistryResponse {
            status: 200,
            body: String::new(),
        })
    }
}

/// Sender that answers immediately and records when each request started.
pub struct TimestampSender {
    starts: Mutex<Vec<Instant>>,
}

#[allow(dead_code)] // Used by other test files
impl TimestampSender {
    pub fn new() -> Self {
        TimestampSender {
            starts: Mutex::new(Vec::new()),
        }
    }

    pub fn starts(&self) -> Vec<Instant> {
        self.starts.lock().unwrap().clone()
    }
}

impl DocumentSender for TimestampSender {
    async fn send_document(
        &self,
        _document: Vec<u8>,
        _signature: &str,
    ) -> Result<RegistryResponse, BoxError> {
        self.starts.lock().unwrap().push(Instant::now());
        Ok(RegistryResponse {
            status: 200,
            body: String::new(),
        })
    }
}

/// Polls `condition` every 5ms until it holds or `limit` elapses.
#[allow(dead_code)] // Used by other test files
pub async fn wait_until<F: Fn() -> bool>(limit: Duration, condition: F) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
