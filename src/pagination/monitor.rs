// SPDX-License-Identifier: MPL-2.0
//! Delayed reconciliation of in-flight page loads.
//!
//! The monitor is not event driven: once armed, it is polled on a fixed
//! delay and re-arms itself until no fetch is outstanding. The first time
//! the loads converge it raises a one-shot "loading complete" flag, after
//! which the gallery stops scrolling the selection into view on its own.

use crate::config::{
    DEFAULT_RECONCILE_INTERVAL_MS, MAX_RECONCILE_INTERVAL_MS, MIN_RECONCILE_INTERVAL_MS,
};
use crate::pagination::PaginationTracker;
use std::time::Duration;

/// Delay between two reconciliation checks.
///
/// Always within the supported range (100 ms – 30 s).
///
/// # Example
///
/// ```
/// use iced_gallery::pagination::ReconcileInterval;
///
/// let interval = ReconcileInterval::from_millis(500);
/// assert_eq!(interval.value(), 500);
///
/// let too_short = ReconcileInterval::from_millis(1);
/// assert_eq!(too_short.value(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileInterval(u64);

impl ReconcileInterval {
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(millis.clamp(MIN_RECONCILE_INTERVAL_MS, MAX_RECONCILE_INTERVAL_MS))
    }

    /// Returns the interval in milliseconds.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for ReconcileInterval {
    fn default() -> Self {
        Self(DEFAULT_RECONCILE_INTERVAL_MS)
    }
}

/// Outcome of a reconciliation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// The monitor was not armed; nothing to do.
    Idle,
    /// Loads are still outstanding; check again after the delay.
    Rearm(Duration),
    /// All loads converged.
    Settled,
}

#[derive(Debug, Clone, Default)]
pub struct LoadingMonitor {
    interval: ReconcileInterval,
    polling: bool,
    loading_complete: bool,
}

impl LoadingMonitor {
    #[must_use]
    pub fn new(interval: ReconcileInterval) -> Self {
        Self {
            interval,
            polling: false,
            loading_complete: false,
        }
    }

    /// Starts polling after a fetch was issued.
    ///
    /// Returns the delay of the first check, or `None` if a check is already
    /// scheduled.
    pub fn arm(&mut self) -> Option<Duration> {
        if self.polling {
            return None;
        }
        self.polling = true;
        Some(self.interval.as_duration())
    }

    /// Runs one scheduled check against the tracker.
    pub fn check(&mut self, tracker: &PaginationTracker) -> Check {
        if !self.polling {
            return Check::Idle;
        }
        if tracker.outstanding() > 0 {
            return Check::Rearm(self.interval.as_duration());
        }

        self.polling = false;
        if !self.loading_complete {
            tracing::debug!("page loading settled");
            self.loading_complete = true;
        }
        Check::Settled
    }

    /// Whether pages are still being reconciled ("still loading" status).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.polling
    }

    /// One-shot flag raised the first time loading converged.
    #[must_use]
    pub fn loading_complete(&self) -> bool {
        self.loading_complete
    }

    /// Whether the gallery may scroll the selection into view automatically.
    #[must_use]
    pub fn allows_scroll_to_selection(&self) -> bool {
        !self.loading_complete
    }

    #[must_use]
    pub fn interval(&self) -> ReconcileInterval {
        self.interval
    }
}
