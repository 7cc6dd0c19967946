//! In-memory store backed by `DashMap`.
//!
//! No persistence and no expiry; operations are atomic per key and never
//! fail. This is the fallback backend the resolver guarantees is always
//! available.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use crate::error::StoreError;
use crate::store::{PrimeCacheKey, PrimeStore};

/// Concurrent map of position to cached prime.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<i64, i64>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        info!("initializing in-memory prime store");
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PrimeStore for MemoryStore {
    async fn get(&self, key: PrimeCacheKey) -> Result<Option<i64>, StoreError> {
        Ok(self.entries.get(&key.position()).map(|entry| *entry))
    }

    async fn put(&self, key: PrimeCacheKey, value: i64) -> Result<(), StoreError> {
        self.entries.insert(key.position(), value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
