//! Dispatch metrics for observability
//!
//! Counters describing what the router did with the events it received:
//! how many were routed, how many matched no target, and how often
//! filters or targets failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatch observability
///
/// # Example
///
/// ```
/// use rust_log_router::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
///
/// metrics.record_routed();
/// metrics.record_unrouted();
/// metrics.record_target_failure();
///
/// assert_eq!(metrics.events_routed(), 1);
/// assert_eq!(metrics.events_unrouted(), 1);
/// assert_eq!(metrics.target_failures(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Events written to at least one target
    events_routed: AtomicU64,

    /// Events no rule selected a target for
    events_unrouted: AtomicU64,

    /// Successful individual target writes
    target_writes: AtomicU64,

    /// Target writes that returned an error or panicked
    target_failures: AtomicU64,

    /// Events dropped because a filter failed
    filter_failures: AtomicU64,
}

impl DispatchMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            events_routed: AtomicU64::new(0),
            events_unrouted: AtomicU64::new(0),
            target_writes: AtomicU64::new(0),
            target_failures: AtomicU64::new(0),
            filter_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn events_routed(&self) -> u64 {
        self.events_routed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn events_unrouted(&self) -> u64 {
        self.events_unrouted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn target_writes(&self) -> u64 {
        self.target_writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn target_failures(&self) -> u64 {
        self.target_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filter_failures(&self) -> u64 {
        self.filter_failures.load(Ordering::Relaxed)
    }

    /// Record a routed event, returning the previous count
    #[inline]
    pub fn record_routed(&self) -> u64 {
        self.events_routed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_unrouted(&self) -> u64 {
        self.events_unrouted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_target_write(&self) -> u64 {
        self.target_writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_target_failure(&self) -> u64 {
        self.target_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filter_failure(&self) -> u64 {
        self.filter_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of target writes that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been written yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.target_failures() as f64;
        let total = self.target_writes() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.events_routed.store(0, Ordering::Relaxed);
        self.events_unrouted.store(0, Ordering::Relaxed);
        self.target_writes.store(0, Ordering::Relaxed);
        self.target_failures.store(0, Ordering::Relaxed);
        self.filter_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            events_routed: AtomicU64::new(self.events_routed()),
            events_unrouted: AtomicU64::new(self.events_unrouted()),
            target_writes: AtomicU64::new(self.target_writes()),
            target_failures: AtomicU64::new(self.target_failures()),
            filter_failures: AtomicU64::new(self.filter_failures()),
        }
    }
}
