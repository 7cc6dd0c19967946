//! Health and info reports derived from the backend selection.
//!
//! A fallback means the service is degraded, not down: correctness is
//! unaffected, only the storage tier changed. Reports serialize directly
//! into whatever health or info endpoint the host application exposes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::Backend;
use crate::resolver::{BackendSelection, FallbackReason};

/// Overall cache health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Degraded,
}

/// Serializable health report for the cache layer.
#[derive(Debug, Clone, Serialize)]
pub struct CacheHealth {
    pub status: HealthStatus,
    pub configured_backend: Option<Backend>,
    pub effective_backend: Backend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
    pub resolved_at: DateTime<Utc>,
}

impl CacheHealth {
    #[must_use]
    pub fn from_selection(selection: &BackendSelection) -> Self {
        let status = if selection.is_fallback() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Up
        };

        Self {
            status,
            configured_backend: selection.configured_backend(),
            effective_backend: selection.effective_backend(),
            fallback_reason: selection.fallback_reason(),
            resolved_at: selection.resolved_at(),
        }
    }
}

/// Info-style summary of the cache selection.
#[must_use]
pub fn cache_info(selection: &BackendSelection) -> Value {
    let mut info = json!({
        "configured_backend": selection.configured_backend(),
        "effective_backend": selection.effective_backend(),
    });

    if let Some(reason) = selection.fallback_reason() {
        if let Some(map) = info.as_object_mut() {
            map.insert("fallback_reason".to_string(), json!(reason));
        }
    }

    json!({ "prime_cache": info })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheSettings;
    use crate::resolver::resolve_backend;

    async fn selection_for(backend: Option<&str>) -> BackendSelection {
        let settings = CacheSettings {
            backend: backend.map(str::to_string),
            ..CacheSettings::default()
        };
        resolve_backend(&settings).await
    }

    #[tokio::test]
    async fn healthy_selection_reports_up() {
        let selection = selection_for(Some("memory")).await;
        let health = CacheHealth::from_selection(&selection);
        assert_eq!(health.status, HealthStatus::Up);
        assert_eq!(health.configured_backend, Some(Backend::Memory));
        assert_eq!(health.effective_backend, Backend::Memory);
        assert!(health.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn fallback_selection_reports_degraded() {
        let selection = selection_for(None).await;
        let health = CacheHealth::from_selection(&selection);
        assert_eq!(health.status, HealthStatus::Degraded);
        assert_eq!(health.fallback_reason, Some(FallbackReason::NotConfigured));
    }

    #[tokio::test]
    async fn health_serializes_with_uppercase_status() {
        let selection = selection_for(None).await;
        let health = CacheHealth::from_selection(&selection);
        let rendered = serde_json::to_value(&health).unwrap();
        assert_eq!(rendered["status"], "DEGRADED");
        assert_eq!(rendered["effective_backend"], "memory");
        assert_eq!(rendered["fallback_reason"], "not_configured");
    }

    #[tokio::test]
    async fn info_omits_reason_when_not_fallback() {
        let selection = selection_for(Some("memory")).await;
        let info = cache_info(&selection);
        assert_eq!(info["prime_cache"]["effective_backend"], "memory");
        assert!(info["prime_cache"].get("fallback_reason").is_none());
    }

    #[tokio::test]
    async fn info_includes_reason_on_fallback() {
        let selection = selection_for(Some("not-a-backend")).await;
        let info = cache_info(&selection);
        assert_eq!(info["prime_cache"]["fallback_reason"], "invalid_value");
        assert_eq!(
            info["prime_cache"]["configured_backend"],
            serde_json::Value::Null
        );
    }
}
