//! Error types for the prime cache.
//!
//! Only [`InvalidPosition`] ever crosses the service boundary as a failure;
//! every [`StoreError`] is absorbed by the orchestrator and surfaces as a
//! recorded outcome plus a recomputed value.

use thiserror::Error;

/// A requested prime position was not a positive integer.
///
/// Raised before any cache access; the store never sees an invalid key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("prime position must be greater than zero, got {0}")]
pub struct InvalidPosition(pub i64);

/// Failure during a cache get or put.
///
/// Adapters signal failure distinctly from "key absent": a lost connection,
/// failed query, or malformed stored value is an error, never an empty
/// result.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Redis command failed (connection loss, timeout, protocol error).
    #[error("redis command failed: {0}")]
    Redis(#[from] redis::RedisError),

    /// Postgres query failed.
    #[error("database query failed: {0}")]
    Database(#[from] sqlx::Error),

    /// A value read back from the store did not parse as an integer.
    #[error("malformed cached value {value:?} for position {position}")]
    MalformedValue { position: i64, value: String },
}
