//! Request orchestration.
//!
//! `PrimeService` answers "what is the N-th prime" through the cache:
//! validate, read, compute on miss, write back. Every store failure is
//! absorbed here and recorded as an outcome; the returned value is the same
//! whether the cache is healthy, failing, or absent.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{error, warn};

use crate::error::InvalidPosition;
use crate::metrics::{CacheMetrics, CacheOperation, CacheOutcome};
use crate::primes;
use crate::store::{PrimeCacheKey, PrimeStore};

/// Caching compute service for nth-prime requests.
pub struct PrimeService {
    store: Arc<dyn PrimeStore>,
    metrics: Arc<CacheMetrics>,
    requests: AtomicU64,
    rejected: AtomicU64,
}

impl PrimeService {
    pub fn new(store: Arc<dyn PrimeStore>, metrics: Arc<CacheMetrics>) -> Self {
        Self {
            store,
            metrics,
            requests: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Return the prime at 1-based `position`.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidPosition`] for `position < 1`; the store is never
    /// touched for invalid input. Store failures never propagate: a failed
    /// read falls through to computation, a failed write leaves the result
    /// uncached.
    pub async fn get_prime(&self, position: i64) -> Result<i64, InvalidPosition> {
        let key = match PrimeCacheKey::new(position) {
            Ok(key) => key,
            Err(err) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                error!(position, "rejected invalid prime position");
                return Err(err);
            }
        };

        self.requests.fetch_add(1, Ordering::Relaxed);

        let cached = match self.store.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(position, error = %err, "failed to read prime from cache");
                self.metrics.record(CacheOperation::Get, CacheOutcome::Error);
                None
            }
        };

        if let Some(value) = cached {
            self.metrics.record(CacheOperation::Get, CacheOutcome::Hit);
            return Ok(value);
        }

        self.metrics.record(CacheOperation::Get, CacheOutcome::Miss);
        let computed = primes::nth_prime(key.position());

        match self.store.put(key, computed).await {
            Ok(()) => {
                self.metrics.record(CacheOperation::Put, CacheOutcome::Success);
            }
            Err(err) => {
                warn!(position, error = %err, "failed to write prime to cache");
                self.metrics.record(CacheOperation::Put, CacheOutcome::Error);
            }
        }

        Ok(computed)
    }

    /// Counters for the cache operations this service performed.
    #[must_use]
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Point-in-time request counters.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            requests: self.requests.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Serializable request counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    /// Requests that passed validation.
    pub requests: u64,
    /// Requests rejected for an invalid position.
    pub rejected: u64,
}
