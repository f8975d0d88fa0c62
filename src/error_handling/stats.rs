//! Submission statistics tracking.
//!
//! This module provides thread-safe counters for submission outcomes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::OutcomeType;

/// Thread-safe submission statistics tracker.
///
/// Counts outcomes using atomic counters, allowing concurrent access from
/// multiple tasks. All outcome types are initialized to zero on creation.
pub struct SubmissionStats {
    outcomes: HashMap<OutcomeType, AtomicUsize>,
}

impl SubmissionStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in OutcomeType::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }
        SubmissionStats { outcomes }
    }

    /// Increment an outcome counter.
    pub fn increment(&self, outcome: OutcomeType) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment outcome counter for {:?} which is not in the map. \
                 This indicates a bug in SubmissionStats initialization.",
                outcome
            );
        }
    }

    /// Get the count for an outcome type.
    pub fn get_count(&self, outcome: OutcomeType) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total submissions that finished, whatever the outcome.
    pub fn total(&self) -> usize {
        OutcomeType::iter().map(|o| self.get_count(o)).sum()
    }

    /// Submissions that did not end in `Accepted`.
    pub fn total_failures(&self) -> usize {
        self.total() - self.get_count(OutcomeType::Accepted)
    }
}

impl Default for SubmissionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs a summary of submission outcomes.
pub fn log_submission_statistics(stats: &SubmissionStats) {
    let total = stats.total();
    if total == 0 {
        log::info!("No documents submitted");
        return;
    }
    log::info!(
        "Submission statistics: total={}, accepted={}, failed={}",
        total,
        stats.get_count(OutcomeType::Accepted),
        stats.total_failures()
    );
    for outcome in OutcomeType::iter().filter(|o| *o != OutcomeType::Accepted) {
        let count = stats.get_count(outcome);
        if count > 0 {
            log::info!("   {}: {}", outcome, count);
        }
    }
}
