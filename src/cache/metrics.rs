//! Cache Metrics Module
//!
//! Tracks hit and miss counters for the cache facade.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Metrics ==
/// Lock-free hit/miss counters.
///
/// A miss is a lookup that found nothing (absent or expired). Writes made
/// through [`Cache::set`](crate::Cache::set) are counted as hits as well.
#[derive(Debug, Default)]
pub struct Metrics {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Point-in-time copy of [`Metrics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub miss_rate: f64,
    pub taken_at: DateTime<Utc>,
}

impl Metrics {
    // == Constructor ==
    /// Creates a new Metrics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn increment_hits(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    pub fn increment_misses(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if nothing was recorded.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    // == Miss Rate ==
    /// Returns `1 - hit_rate`, so 1.0 before any traffic.
    pub fn miss_rate(&self) -> f64 {
        1.0 - self.hit_rate()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            hit_rate: self.hit_rate(),
            miss_rate: self.miss_rate(),
            taken_at: Utc::now(),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.hits(), 0);
        assert_eq!(metrics.misses(), 0);
    }

    #[test]
    fn test_rates_no_requests() {
        let metrics = Metrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);
        assert_eq!(metrics.miss_rate(), 1.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let metrics = Metrics::new();
        metrics.increment_hits();
        metrics.increment_hits();
        metrics.increment_hits();
        assert_eq!(metrics.hit_rate(), 1.0);
        assert_eq!(metrics.miss_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let metrics = Metrics::new();
        metrics.increment_hits();
        metrics.increment_misses();
        metrics.increment_misses();
        metrics.increment_misses();
        assert_eq!(metrics.hit_rate(), 0.25);
        assert_eq!(metrics.miss_rate(), 0.75);
    }

    #[test]
    fn test_counters_are_shared_across_threads() {
        let metrics = Metrics::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..250 {
                        metrics.increment_hits();
                        metrics.increment_misses();
                    }
                });
            }
        });
        assert_eq!(metrics.hits(), 1000);
        assert_eq!(metrics.misses(), 1000);
    }

    #[test]
    fn test_snapshot_serializes() {
        let metrics = Metrics::new();
        metrics.increment_hits();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 0);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["hit_rate"], 1.0);
        assert!(json["taken_at"].is_string());
    }
}
