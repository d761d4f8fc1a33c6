//! Service health report

use super::DietService;
use crate::storage::Store;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// "healthy" or "degraded"
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub checks: BTreeMap<String, HealthCheck>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: Option<String>,
}

impl HealthCheck {
    fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            message: Some(message.into()),
        }
    }

    fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            message: Some(message.into()),
        }
    }
}

impl<S: Store> DietService<S> {
    pub async fn health(&self) -> HealthStatus {
        let mut checks = BTreeMap::new();

        let storage = match self.store.ping().await {
            Ok(()) => HealthCheck::healthy("Store reachable"),
            Err(e) => {
                tracing::warn!(error = %e, "Storage health check failed");
                HealthCheck::unhealthy(e.to_error_body().error)
            }
        };
        checks.insert("storage".to_string(), storage);
        checks.insert(
            "catalog".to_string(),
            HealthCheck::healthy(format!("{} recipes", crate::catalog::all().len())),
        );

        let overall_healthy = checks.values().all(|check| check.status == "healthy");

        HealthStatus {
            status: if overall_healthy { "healthy" } else { "degraded" }.to_string(),
            timestamp: self.clock.now(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
            checks,
        }
    }
}
