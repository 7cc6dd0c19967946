//! Cache store abstraction and backend adapters.
//!
//! All backends implement [`PrimeStore`]: a mapping from a validated
//! position to a stored prime. Absence and failure are distinct outcomes,
//! entries never expire, and every adapter is safe for unbounded concurrent
//! use behind an `Arc` without external locking.

use async_trait::async_trait;

use crate::error::{InvalidPosition, StoreError};

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use redis::RedisStore;

/// A validated positive prime position, usable as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimeCacheKey {
    position: i64,
}

impl PrimeCacheKey {
    /// Build a key, rejecting non-positive positions before any cache
    /// access.
    pub fn new(position: i64) -> Result<Self, InvalidPosition> {
        if position < 1 {
            return Err(InvalidPosition(position));
        }
        Ok(Self { position })
    }

    #[must_use]
    pub fn position(self) -> i64 {
        self.position
    }
}

/// Storage backend for cached primes.
///
/// # Contract
///
/// - `get` returns `Ok(None)` for an absent key; any store failure is an
///   `Err`, never silently mapped to absent.
/// - `put` overwrites an existing key entirely (last write wins).
#[async_trait]
pub trait PrimeStore: Send + Sync {
    /// Look up the cached prime for `key`.
    async fn get(&self, key: PrimeCacheKey) -> Result<Option<i64>, StoreError>;

    /// Store or overwrite the prime for `key`.
    async fn put(&self, key: PrimeCacheKey, value: i64) -> Result<(), StoreError>;

    /// Backend name used in logs.
    fn name(&self) -> &'static str;
}
