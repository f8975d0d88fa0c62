//! The rate limiter handle.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::gate::{SlotGuard, WindowGate};
use super::resetter::spawn_window_resetter;
use crate::config::TimeUnit;
use crate::error_handling::{AcquireError, RateLimitError};

/// Fixed-window rate limiter shared by concurrent callers.
///
/// Admits at most `request_limit` operations per window, and never more than
/// `request_limit` at once. Callers that cannot be admitted wait in arrival
/// order. Capacity is restored by a background task owned by this handle.
///
/// # Behavior
///
/// - A window tick restores the admission budget but never reclaims slots that
///   are still held
/// - Releasing a slot (dropping its `SlotGuard`) frees it for concurrency but
///   does not add to the current window's budget
/// - `shutdown()` stops the background task and fails queued callers with
///   `AcquireError::Cancelled`; slots already granted stay valid
/// - Dropping the limiter shuts it down
pub struct RateLimiter {
    gate: Arc<WindowGate>,
    window: Duration,
    shutdown: CancellationToken,
    resetter: Mutex<Option<JoinHandle<()>>>,
}

impl RateLimiter {
    /// Creates a limiter admitting `request_limit` operations per `window`.
    ///
    /// Must be called from within a Tokio runtime, which hosts the background
    /// window resetter.
    ///
    /// # Errors
    ///
    /// - `RateLimitError::InvalidLimit` if `request_limit <= 0`
    /// - `RateLimitError::InvalidWindow` if `window` is zero
    /// - `RateLimitError::NoRuntime` if no Tokio runtime is available
    pub fn new(window: Duration, request_limit: i64) -> Result<Self, RateLimitError> {
        if request_limit <= 0 {
            return Err(RateLimitError::InvalidLimit(request_limit));
        }
        let capacity =
            usize::try_from(request_limit).map_err(|_| RateLimitError::InvalidLimit(request_limit))?;
        if window.is_zero() {
            return Err(RateLimitError::InvalidWindow);
        }
        let runtime = Handle::try_current().map_err(|_| RateLimitError::NoRuntime)?;

        let gate = Arc::new(WindowGate::new(capacity));
        let shutdown = CancellationToken::new();
        let resetter =
            spawn_window_resetter(&runtime, Arc::clone(&gate), window, shutdown.clone());

        log::debug!(
            "Rate limiter started: {} request(s) per {:?}",
            capacity,
            window
        );

        Ok(RateLimiter {
            gate,
            window,
            shutdown,
            resetter: Mutex::new(Some(resetter)),
        })
    }

    /// Creates a limiter admitting `request_limit` operations per `unit`.
    pub fn per(unit: TimeUnit, request_limit: i64) -> Result<Self, RateLimitError> {
        Self::new(unit.as_duration(), request_limit)
    }

    /// Waits for a slot. The slot is held until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns `AcquireError::Cancelled` if the limiter is shut down before
    /// a slot is granted.
    pub async fn acquire(&self) -> Result<SlotGuard, AcquireError> {
        self.gate.acquire().await
    }

    /// Maximum admissions per window.
    pub fn capacity(&self) -> usize {
        self.gate.capacity()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admissions grantable right now without waiting.
    pub fn available_slots(&self) -> usize {
        self.gate.available_slots()
    }

    /// Slots granted and not yet released.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Callers currently queued for a slot.
    pub fn waiting(&self) -> usize {
        self.gate.waiting()
    }

    pub fn is_shut_down(&self) -> bool {
        self.gate.is_closed()
    }

    /// Stops the window resetter and cancels queued callers.
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn shutdown(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();
        self.gate.close();
        log::debug!("Rate limiter shut down");
    }

    /// Shuts down and waits for the window resetter task to finish.
    pub async fn shutdown_gracefully(&self) {
        self.shutdown();
        let resetter = self
            .resetter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(resetter) = resetter {
            if let Err(e) = resetter.await {
                log::warn!("Window resetter task failed: {}", e);
            }
        }
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("capacity", &self.capacity())
            .field("window", &self.window)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}
