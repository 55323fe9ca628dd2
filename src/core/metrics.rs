//! Dispatch counters kept by each logger

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated on every dispatch.
///
/// An entry counts as logged when every sink that accepted it succeeded,
/// and as dropped when at least one of them failed or it was rejected as a
/// re-entrant call.
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    logged: AtomicU64,
    dropped: AtomicU64,
    isolated_panics: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            logged: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            isolated_panics: AtomicU64::new(0),
        }
    }

    pub fn total_logged(&self) -> u64 {
        self.logged.load(Ordering::Relaxed)
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Sink panics caught while `exit_on_error` was off
    pub fn isolated_panics(&self) -> u64 {
        self.isolated_panics.load(Ordering::Relaxed)
    }

    pub(crate) fn record_logged(&self) {
        self.logged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_isolated_panic(&self) {
        self.isolated_panics.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current values
    ///
    /// ```
    /// use logger_preset::Logger;
    ///
    /// let logger = Logger::new();
    /// logger.info("counted");
    ///
    /// let snapshot = logger.metrics().snapshot();
    /// assert_eq!(snapshot.logged, 1);
    /// assert_eq!(snapshot.drop_rate(), 0.0);
    /// ```
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            logged: self.total_logged(),
            dropped: self.dropped_count(),
            isolated_panics: self.isolated_panics(),
        }
    }
}

/// Point-in-time copy of [`LoggerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub logged: u64,
    pub dropped: u64,
    pub isolated_panics: u64,
}

impl MetricsSnapshot {
    /// Percentage of entries dropped, 0.0 when nothing was dispatched
    pub fn drop_rate(&self) -> f64 {
        let total = self.logged + self.dropped;
        if total == 0 {
            return 0.0;
        }
        self.dropped as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_detached() {
        let metrics = LoggerMetrics::new();
        metrics.record_logged();
        metrics.record_isolated_panic();

        let snapshot = metrics.snapshot();
        metrics.record_dropped();

        assert_eq!(
            snapshot,
            MetricsSnapshot {
                logged: 1,
                dropped: 0,
                isolated_panics: 1
            }
        );
        assert_eq!(metrics.dropped_count(), 1);
    }

    #[test]
    fn test_drop_rate() {
        assert_eq!(MetricsSnapshot::default().drop_rate(), 0.0);

        let snapshot = MetricsSnapshot {
            logged: 90,
            dropped: 10,
            isolated_panics: 0,
        };
        assert!((snapshot.drop_rate() - 10.0).abs() < 1e-9);
    }
}
