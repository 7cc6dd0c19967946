//! Shared test doubles for service-level tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use prime_cache::{MemoryStore, PrimeCacheKey, PrimeStore, StoreError};

/// A store wrapper that counts calls and can be told to fail reads or
/// writes, backed by a real in-memory store for the healthy paths.
pub struct FaultyStore {
    inner: MemoryStore,
    fail_gets: bool,
    fail_puts: bool,
    gets: AtomicU64,
    puts: AtomicU64,
}

impl FaultyStore {
    pub fn reliable() -> Self {
        Self::with_faults(false, false)
    }

    pub fn failing_gets() -> Self {
        Self::with_faults(true, false)
    }

    pub fn failing_puts() -> Self {
        Self::with_faults(false, true)
    }

    fn with_faults(fail_gets: bool, fail_puts: bool) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_gets,
            fail_puts,
            gets: AtomicU64::new(0),
            puts: AtomicU64::new(0),
        }
    }

    pub fn gets(&self) -> u64 {
        self.gets.load(Ordering::Relaxed)
    }

    pub fn puts(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }
}

fn injected_failure() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl PrimeStore for FaultyStore {
    async fn get(&self, key: PrimeCacheKey) -> Result<Option<i64>, StoreError> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        if self.fail_gets {
            return Err(injected_failure());
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: PrimeCacheKey, value: i64) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::Relaxed);
        if self.fail_puts {
            return Err(injected_failure());
        }
        self.inner.put(key, value).await
    }

    fn name(&self) -> &'static str {
        "faulty"
    }
}
