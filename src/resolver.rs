//! Startup backend resolution.
//!
//! Runs once before any request is served and can never fail: every input,
//! including misconfiguration and an unreachable backend, resolves to a
//! usable effective backend. Non-memory backends are probed with a bounded
//! timeout; a failed probe downgrades to memory rather than blocking
//! startup.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::config::{Backend, CacheSettings, PostgresSettings, RedisSettings};

/// Upper bound on a single connectivity probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Why the effective backend differs from the configured preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No backend was configured.
    NotConfigured,
    /// The configured value is not a known backend.
    InvalidValue,
    /// The startup probe could not reach the configured backend.
    ConnectivityFailed,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotConfigured => "not_configured",
            Self::InvalidValue => "invalid_value",
            Self::ConnectivityFailed => "connectivity_failed",
        };
        f.write_str(name)
    }
}

/// Immutable record of the startup resolution.
///
/// Created exactly once, then shared read-only with the store factory and
/// the health/info surfaces for the lifetime of the process.
#[derive(Debug, Clone, Serialize)]
pub struct BackendSelection {
    configured: Option<Backend>,
    effective: Backend,
    fallback_reason: Option<FallbackReason>,
    resolved_at: DateTime<Utc>,
}

impl BackendSelection {
    fn new(
        configured: Option<Backend>,
        effective: Backend,
        fallback_reason: Option<FallbackReason>,
    ) -> Self {
        Self {
            configured,
            effective,
            fallback_reason,
            resolved_at: Utc::now(),
        }
    }

    /// The configured preference; `None` when absent or unrecognized.
    #[must_use]
    pub fn configured_backend(&self) -> Option<Backend> {
        self.configured
    }

    /// The backend actually in use.
    #[must_use]
    pub fn effective_backend(&self) -> Backend {
        self.effective
    }

    #[must_use]
    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        self.fallback_reason
    }

    /// When the resolution ran.
    #[must_use]
    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    /// Whether the effective backend was downgraded from the preference.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Resolve the effective backend from settings and live connectivity.
///
/// Memory needs no probe. Redis and Postgres are probed with a single
/// bounded round-trip; any probe failure is caught here and downgrades the
/// selection to memory with [`FallbackReason::ConnectivityFailed`].
pub async fn resolve_backend(settings: &CacheSettings) -> BackendSelection {
    let Some(raw) = settings.backend.as_deref() else {
        warn!("no cache backend configured, defaulting to memory");
        return BackendSelection::new(None, Backend::Memory, Some(FallbackReason::NotConfigured));
    };

    let Ok(configured) = raw.parse::<Backend>() else {
        warn!(value = %raw, "unrecognized cache backend, defaulting to memory");
        return BackendSelection::new(None, Backend::Memory, Some(FallbackReason::InvalidValue));
    };

    if configured == Backend::Memory {
        info!("cache backend memory selected");
        return BackendSelection::new(Some(Backend::Memory), Backend::Memory, None);
    }

    if probe_connectivity(configured, settings).await {
        info!(backend = %configured, "cache backend selected as effective backend");
        BackendSelection::new(Some(configured), configured, None)
    } else {
        warn!(backend = %configured, "configured backend is unreachable, falling back to memory");
        BackendSelection::new(
            Some(configured),
            Backend::Memory,
            Some(FallbackReason::ConnectivityFailed),
        )
    }
}

async fn probe_connectivity(backend: Backend, settings: &CacheSettings) -> bool {
    let probe = async {
        match backend {
            Backend::Redis => probe_redis(&settings.redis).await,
            Backend::Postgres => probe_postgres(&settings.postgres).await,
            Backend::Memory => Ok(()),
        }
    };

    match tokio::time::timeout(PROBE_TIMEOUT, probe).await {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            warn!(backend = %backend, error = %err, "connectivity probe failed");
            false
        }
        Err(_) => {
            warn!(
                backend = %backend,
                timeout_secs = PROBE_TIMEOUT.as_secs(),
                "connectivity probe timed out"
            );
            false
        }
    }
}

async fn probe_redis(settings: &RedisSettings) -> anyhow::Result<()> {
    let client = redis::Client::open(settings.url())?;
    let mut conn = redis::aio::ConnectionManager::new(client).await?;
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(())
}

async fn probe_postgres(settings: &PostgresSettings) -> anyhow::Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(PROBE_TIMEOUT)
        .connect(&settings.url())
        .await?;
    let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
    pool.close().await;
    anyhow::ensure!(one == 1, "unexpected probe result {one}");
    Ok(())
}
