//! The window gate: the permit pool behind the rate limiter.
//!
//! Two counters are tracked under a single mutex:
//! - the window budget (admissions left in the current window)
//! - the in-flight count (admitted slots not yet released)
//!
//! A slot is grantable only when both allow it, so a window tick can never
//! hand out a slot that is still held by an unfinished operation.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::error_handling::AcquireError;

struct GateState {
    window_budget: usize,
    in_flight: usize,
    closed: bool,
    waiters: VecDeque<oneshot::Sender<()>>,
}

impl GateState {
    fn available(&self, capacity: usize) -> usize {
        self.window_budget.min(capacity - self.in_flight)
    }

    fn admit(&mut self) {
        self.window_budget -= 1;
        self.in_flight += 1;
    }

    fn assert_invariants(&self, capacity: usize) {
        assert!(
            self.window_budget <= capacity,
            "window budget {} exceeds capacity {}",
            self.window_budget,
            capacity
        );
        assert!(
            self.in_flight <= capacity,
            "in-flight count {} exceeds capacity {}",
            self.in_flight,
            capacity
        );
    }
}

/// Fixed-window permit pool with FIFO admission.
pub(crate) struct WindowGate {
    capacity: usize,
    state: Mutex<GateState>,
}

impl WindowGate {
    /// Creates a gate with a full window budget.
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "gate capacity must be positive");
        WindowGate {
            capacity,
            state: Mutex::new(GateState {
                window_budget: capacity,
                in_flight: 0,
                closed: false,
                waiters: VecDeque::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Admissions grantable right now.
    pub(crate) fn available_slots(&self) -> usize {
        self.lock().available(self.capacity)
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Number of acquirers currently queued (including ones whose future was
    /// dropped but have not been swept yet).
    pub(crate) fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Waits for a slot, in arrival order.
    ///
    /// Returns `AcquireError::Cancelled` if the gate is closed before a
    /// slot is granted. Dropping the returned future while it is queued is
    /// safe: a slot granted concurrently with the drop is handed back.
    pub(crate) async fn acquire(self: &Arc<Self>) -> Result<SlotGuard, AcquireError> {
        let rx = {
            let mut state = self.lock();
            if state.closed {
                return Err(AcquireError::Cancelled);
            }
            if state.waiters.is_empty() && state.available(self.capacity) > 0 {
                state.admit();
                state.assert_invariants(self.capacity);
                return Ok(SlotGuard::new(Arc::clone(self)));
            }
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            self.dispatch(&mut state);
            rx
        };

        log::trace!("No slot available, queued for admission");
        PendingSlot {
            gate: Arc::clone(self),
            rx,
            finished: false,
        }
        .wait()
        .await
    }

    /// Adds up to `to_add` admissions to the current window, clamped to capacity.
    pub(crate) fn top_up(&self, to_add: usize) -> usize {
        let mut state = self.lock();
        let before = state.window_budget;
        state.window_budget = before.saturating_add(to_add).min(self.capacity);
        let added = state.window_budget - before;
        self.dispatch(&mut state);
        added
    }

    /// Restores the window budget to full capacity.
    ///
    /// Returns how many admissions were restored.
    pub(crate) fn replenish(&self) -> usize {
        self.top_up(self.capacity)
    }

    /// Returns a held slot to the pool. Only called by `SlotGuard`.
    fn release(&self) {
        let mut state = self.lock();
        assert!(state.in_flight > 0, "slot released without a matching admission");
        state.in_flight -= 1;
        self.dispatch(&mut state);
    }

    /// Rejects every queued acquirer and all future ones. Held slots stay valid.
    pub(crate) fn close(&self) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        let rejected = state.waiters.len();
        // Dropping the senders wakes each receiver with a closed-channel error.
        state.waiters.clear();
        if rejected > 0 {
            log::debug!("Gate closed, cancelling {} queued acquirer(s)", rejected);
        }
        true
    }

    /// Grants slots to queued acquirers, front first, while any are available.
    fn dispatch(&self, state: &mut GateState) {
        while state.available(self.capacity) > 0 {
            let Some(tx) = state.waiters.pop_front() else {
                break;
            };
            // A send fails only when the waiting future is already gone.
            if tx.send(()).is_ok() {
                state.admit();
            }
        }
        state.assert_invariants(self.capacity);
    }
}

struct PendingSlot {
    gate: Arc<WindowGate>,
    rx: oneshot::Receiver<()>,
    finished: bool,
}

impl PendingSlot {
    async fn wait(mut self) -> Result<SlotGuard, AcquireError> {
        let outcome = (&mut self.rx).await;
        self.finished = true;
        match outcome {
            Ok(()) => Ok(SlotGuard::new(Arc::clone(&self.gate))),
            Err(_) => Err(AcquireError::Cancelled),
        }
    }
}

impl Drop for PendingSlot {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.rx.close();
        if self.rx.try_recv().is_ok() {
            // The admission already counted against this window; only the
            // concurrency slot is returned.
            self.gate.release();
        }
    }
}

/// An admitted slot. The slot is released when the guard is dropped.
#[must_use = "the slot is released as soon as the guard is dropped"]
pub struct SlotGuard {
    gate: Arc<WindowGate>,
}

impl SlotGuard {
    fn new(gate: Arc<WindowGate>) -> Self {
        SlotGuard { gate }
    }

    /// Releases the slot now instead of at the end of the scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.gate.release();
    }
}

impl std::fmt::Debug for SlotGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotGuard")
            .field("capacity", &self.gate.capacity)
            .finish()
    }
}
