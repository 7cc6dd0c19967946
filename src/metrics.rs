//! Cache operation metrics.
//!
//! Lock-free counters keyed by (operation, outcome), labeled with the
//! effective backend. The orchestrator records one outcome per cache call;
//! a metrics exporter can read a [`CacheMetricsSnapshot`] at any time.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Backend;

/// Cache call being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOperation {
    Get,
    Put,
}

/// Outcome of a cache call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
    Error,
    Success,
}

/// Counters for cache operations against the effective backend.
#[derive(Debug)]
pub struct CacheMetrics {
    backend: Backend,
    get_hits: AtomicU64,
    get_misses: AtomicU64,
    get_errors: AtomicU64,
    put_successes: AtomicU64,
    put_errors: AtomicU64,
}

impl CacheMetrics {
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        info!(backend = %backend, "cache metrics initialized");
        Self {
            backend,
            get_hits: AtomicU64::new(0),
            get_misses: AtomicU64::new(0),
            get_errors: AtomicU64::new(0),
            put_successes: AtomicU64::new(0),
            put_errors: AtomicU64::new(0),
        }
    }

    /// Backend this instance is labeled with.
    #[must_use]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Record one cache operation outcome.
    ///
    /// Combinations outside the contract (a `get` cannot `Success`, a `put`
    /// cannot `Hit` or `Miss`) are not counted.
    pub fn record(&self, operation: CacheOperation, outcome: CacheOutcome) {
        let counter = match (operation, outcome) {
            (CacheOperation::Get, CacheOutcome::Hit) => &self.get_hits,
            (CacheOperation::Get, CacheOutcome::Miss) => &self.get_misses,
            (CacheOperation::Get, CacheOutcome::Error) => &self.get_errors,
            (CacheOperation::Put, CacheOutcome::Success) => &self.put_successes,
            (CacheOperation::Put, CacheOutcome::Error) => &self.put_errors,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        debug!(backend = %self.backend, ?operation, ?outcome, "recorded cache operation");
    }

    /// Point-in-time view of all counters.
    #[must_use]
    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            backend: self.backend,
            get_hits: self.get_hits.load(Ordering::Relaxed),
            get_misses: self.get_misses.load(Ordering::Relaxed),
            get_errors: self.get_errors.load(Ordering::Relaxed),
            put_successes: self.put_successes.load(Ordering::Relaxed),
            put_errors: self.put_errors.load(Ordering::Relaxed),
        }
    }
}

/// Serializable counter snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheMetricsSnapshot {
    pub backend: Backend,
    pub get_hits: u64,
    pub get_misses: u64,
    pub get_errors: u64,
    pub put_successes: u64,
    pub put_errors: u64,
}

impl CacheMetricsSnapshot {
    /// Share of reads that hit, as a percentage. Zero when nothing was read.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let reads = self.get_hits + self.get_misses + self.get_errors;
        if reads == 0 {
            return 0.0;
        }
        self.get_hits as f64 / reads as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_valid_combination() {
        let metrics = CacheMetrics::new(Backend::Memory);
        metrics.record(CacheOperation::Get, CacheOutcome::Hit);
        metrics.record(CacheOperation::Get, CacheOutcome::Miss);
        metrics.record(CacheOperation::Get, CacheOutcome::Miss);
        metrics.record(CacheOperation::Get, CacheOutcome::Error);
        metrics.record(CacheOperation::Put, CacheOutcome::Success);
        metrics.record(CacheOperation::Put, CacheOutcome::Error);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.get_hits, 1);
        assert_eq!(snapshot.get_misses, 2);
        assert_eq!(snapshot.get_errors, 1);
        assert_eq!(snapshot.put_successes, 1);
        assert_eq!(snapshot.put_errors, 1);
        assert_eq!(snapshot.backend, Backend::Memory);
    }

    #[test]
    fn ignores_combinations_outside_the_contract() {
        let metrics = CacheMetrics::new(Backend::Redis);
        metrics.record(CacheOperation::Get, CacheOutcome::Success);
        metrics.record(CacheOperation::Put, CacheOutcome::Hit);
        metrics.record(CacheOperation::Put, CacheOutcome::Miss);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.get_hits, 0);
        assert_eq!(snapshot.put_successes, 0);
    }

    #[test]
    fn hit_rate_over_reads() {
        let metrics = CacheMetrics::new(Backend::Memory);
        assert!((metrics.snapshot().hit_rate() - 0.0).abs() < f64::EPSILON);

        metrics.record(CacheOperation::Get, CacheOutcome::Hit);
        metrics.record(CacheOperation::Get, CacheOutcome::Miss);
        assert!((metrics.snapshot().hit_rate() - 50.0).abs() < f64::EPSILON);
    }
}
