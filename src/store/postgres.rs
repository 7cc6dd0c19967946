//! Postgres store adapter.
//!
//! One table, one row per position. The table is created on first
//! construction if it does not exist, and `put` is an upsert so concurrent
//! writers for the same position settle on last-write-wins.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};

use crate::config::PostgresSettings;
use crate::error::StoreError;
use crate::store::{PrimeCacheKey, PrimeStore};

const CREATE_TABLE_SQL: &str = "\
    CREATE TABLE IF NOT EXISTS prime_cache (\
        position BIGINT PRIMARY KEY,\
        prime_value BIGINT NOT NULL,\
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),\
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()\
    )";

const SELECT_SQL: &str = "SELECT prime_value FROM prime_cache WHERE position = $1";

const UPSERT_SQL: &str = "\
    INSERT INTO prime_cache (position, prime_value) VALUES ($1, $2) \
    ON CONFLICT (position) \
    DO UPDATE SET prime_value = EXCLUDED.prime_value, updated_at = now()";

/// Relational store client for cached primes.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect using the configured host, credentials and database, and
    /// ensure the cache table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot connect or the table cannot be
    /// created.
    pub async fn connect(settings: &PostgresSettings) -> Result<Self> {
        info!(
            host = %settings.host,
            port = settings.port,
            database = %settings.database,
            "initializing Postgres prime store"
        );

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&settings.url())
            .await
            .context("failed to connect to Postgres")?;

        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, ensuring the cache table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be created.
    pub async fn with_pool(pool: PgPool) -> Result<Self> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&pool)
            .await
            .context("failed to create prime_cache table")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl PrimeStore for PostgresStore {
    async fn get(&self, key: PrimeCacheKey) -> Result<Option<i64>, StoreError> {
        let value: Option<i64> = sqlx::query_scalar(SELECT_SQL)
            .bind(key.position())
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn put(&self, key: PrimeCacheKey, value: i64) -> Result<(), StoreError> {
        sqlx::query(UPSERT_SQL)
            .bind(key.position())
            .bind(value)
            .execute(&self.pool)
            .await?;

        debug!(position = key.position(), value, "[postgres] cached prime");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
