//! Fixed-window rate limiting.
//!
//! This module implements the admission gate used by the registry client:
//! - `gate`: the permit pool (window budget + in-flight count, FIFO waiters)
//! - `resetter`: the background task restoring the budget every window
//! - `limiter`: the public handle tying both together with shutdown support
//!
//! This is a counting gate, not a smoothing limiter: capacity comes back in
//! one step at each window boundary.

mod gate;
mod limiter;
mod resetter;

pub use gate::SlotGuard;
pub use limiter::RateLimiter;
