//! Prime Cache
//!
//! Computes the N-th prime on request and caches results behind a pluggable
//! storage backend chosen at startup:
//! - **Memory**: concurrent in-process map, always available
//! - **Redis**: remote key-value store, keys namespaced under `prime:cache:`
//! - **Postgres**: one upserted row per position
//!
//! The configured backend is probed once at startup; if it is absent,
//! unrecognized, or unreachable, the service falls back to memory and keeps
//! serving correct results. At request time every cache failure is absorbed:
//! a broken cache only costs recomputation, never a wrong answer or a failed
//! request.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use prime_cache::PrimeCacheSystem;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Backend and connection targets come from PRIME_CACHE_* env vars.
//!     let system = PrimeCacheSystem::from_env().await?;
//!
//!     assert_eq!(system.get_prime(10).await?, 29);
//!
//!     let health = system.health();
//!     tracing::info!(status = ?health.status, "cache health");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! startup:  CacheSettings → resolve_backend (probe) → BackendSelection → PrimeStore
//! request:  validate → cache get → hit? return : compute → cache put → return
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

pub mod config;
pub mod error;
pub mod metrics;
pub mod observability;
pub mod primes;
pub mod resolver;
pub mod service;
pub mod store;

pub use config::{Backend, CacheSettings, PostgresSettings, RedisSettings};
pub use error::{InvalidPosition, StoreError};
pub use metrics::{CacheMetrics, CacheMetricsSnapshot, CacheOperation, CacheOutcome};
pub use observability::{CacheHealth, HealthStatus, cache_info};
pub use resolver::{BackendSelection, FallbackReason, resolve_backend};
pub use service::{PrimeService, ServiceStats};
pub use store::{MemoryStore, PostgresStore, PrimeCacheKey, PrimeStore, RedisStore};

// Re-export async_trait for custom store implementations.
pub use async_trait::async_trait;

/// Main entry point: resolved backend, store, metrics and service wired
/// together.
///
/// Construction runs the startup resolution exactly once; the resulting
/// [`BackendSelection`] stays immutable for the lifetime of the system and
/// every request goes through the same store instance.
#[derive(Clone)]
pub struct PrimeCacheSystem {
    service: Arc<PrimeService>,
    selection: Arc<BackendSelection>,
    metrics: Arc<CacheMetrics>,
    store: Arc<dyn PrimeStore>,
}

impl PrimeCacheSystem {
    /// Build the system from explicit settings.
    ///
    /// The resolver itself never fails; an unreachable configured backend
    /// falls back to memory. Construction can still fail if the probed
    /// backend goes away between the probe and client setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the store client for the effective backend
    /// cannot be constructed.
    pub async fn new(settings: CacheSettings) -> Result<Self> {
        info!("initializing prime cache system");

        let selection = resolver::resolve_backend(&settings).await;
        let store = build_store(&selection, &settings).await?;
        let metrics = Arc::new(CacheMetrics::new(selection.effective_backend()));
        let service = Arc::new(PrimeService::new(Arc::clone(&store), Arc::clone(&metrics)));

        info!(
            backend = %selection.effective_backend(),
            fallback = selection.is_fallback(),
            "prime cache system initialized"
        );

        Ok(Self {
            service,
            selection: Arc::new(selection),
            metrics,
            store,
        })
    }

    /// Build the system from `PRIME_CACHE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`PrimeCacheSystem::new`].
    pub async fn from_env() -> Result<Self> {
        Self::new(CacheSettings::from_env()).await
    }

    /// Return the prime at 1-based `position`.
    ///
    /// # Errors
    ///
    /// Fails only with [`InvalidPosition`]; cache health never affects the
    /// result.
    pub async fn get_prime(&self, position: i64) -> Result<i64, InvalidPosition> {
        self.service.get_prime(position).await
    }

    /// Request orchestrator, for callers that want to share it directly.
    #[must_use]
    pub fn service(&self) -> &Arc<PrimeService> {
        &self.service
    }

    /// The immutable startup selection.
    #[must_use]
    pub fn selection(&self) -> &BackendSelection {
        &self.selection
    }

    /// Cache operation counters.
    #[must_use]
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Name of the store actually serving requests.
    #[must_use]
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Health report: `Degraded` when running on a fallback backend.
    #[must_use]
    pub fn health(&self) -> CacheHealth {
        CacheHealth::from_selection(&self.selection)
    }
}

async fn build_store(
    selection: &BackendSelection,
    settings: &CacheSettings,
) -> Result<Arc<dyn PrimeStore>> {
    let store: Arc<dyn PrimeStore> = match selection.effective_backend() {
        Backend::Memory => Arc::new(MemoryStore::new()),
        Backend::Redis => Arc::new(
            RedisStore::connect(&settings.redis)
                .await
                .context("failed to construct Redis prime store")?,
        ),
        Backend::Postgres => Arc::new(
            PostgresStore::connect(&settings.postgres)
                .await
                .context("failed to construct Postgres prime store")?,
        ),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_to_memory_and_serves_requests() {
        let system = PrimeCacheSystem::new(CacheSettings::default()).await.unwrap();

        assert_eq!(system.store_name(), "memory");
        assert_eq!(system.selection().effective_backend(), Backend::Memory);
        assert!(system.selection().is_fallback());

        assert_eq!(system.get_prime(5).await, Ok(11));
        assert_eq!(system.metrics().snapshot().get_misses, 1);
    }

    #[tokio::test]
    async fn explicit_memory_backend_is_not_a_fallback() {
        let settings = CacheSettings {
            backend: Some("memory".to_string()),
            ..CacheSettings::default()
        };
        let system = PrimeCacheSystem::new(settings).await.unwrap();

        assert!(!system.selection().is_fallback());
        assert_eq!(system.health().status, HealthStatus::Up);
    }
}
