//! Redis store adapter.
//!
//! Keys are namespaced under `prime:cache:` to keep clear of unrelated data
//! in a shared instance; values travel as decimal text. Uses
//! `ConnectionManager` so a dropped connection reconnects automatically
//! between requests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use crate::config::RedisSettings;
use crate::error::StoreError;
use crate::store::{PrimeCacheKey, PrimeStore};

const KEY_PREFIX: &str = "prime:cache:";

/// Remote key-value store client for cached primes.
pub struct RedisStore {
    conn_manager: ConnectionManager,
}

impl RedisStore {
    /// Connect using the configured host and port.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created or the initial
    /// connection fails.
    pub async fn connect(settings: &RedisSettings) -> Result<Self> {
        Self::with_url(&settings.url()).await
    }

    /// Connect to an explicit Redis URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created or the initial
    /// connection fails.
    pub async fn with_url(redis_url: &str) -> Result<Self> {
        info!(redis_url = %redis_url, "initializing Redis prime store");

        let client = redis::Client::open(redis_url)
            .with_context(|| format!("failed to create Redis client for {redis_url}"))?;
        let conn_manager = ConnectionManager::new(client)
            .await
            .context("failed to establish Redis connection manager")?;

        Ok(Self { conn_manager })
    }

    fn cache_key(key: PrimeCacheKey) -> String {
        format!("{KEY_PREFIX}{}", key.position())
    }
}

#[async_trait]
impl PrimeStore for RedisStore {
    async fn get(&self, key: PrimeCacheKey) -> Result<Option<i64>, StoreError> {
        let mut conn = self.conn_manager.clone();

        let stored: Option<String> = conn.get(Self::cache_key(key)).await?;
        let Some(text) = stored else {
            return Ok(None);
        };

        // A value we cannot parse back is a store failure, not a miss.
        let value = text
            .parse::<i64>()
            .map_err(|_| StoreError::MalformedValue {
                position: key.position(),
                value: text,
            })?;

        Ok(Some(value))
    }

    async fn put(&self, key: PrimeCacheKey, value: i64) -> Result<(), StoreError> {
        let mut conn = self.conn_manager.clone();

        let _: () = conn.set(Self::cache_key(key), value.to_string()).await?;
        debug!(position = key.position(), value, "[redis] cached prime");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        let key = PrimeCacheKey::new(42).unwrap();
        assert_eq!(RedisStore::cache_key(key), "prime:cache:42");
    }
}
