//! # Store Health Check
//!
//! Liveness contract for the health endpoint: one store round-trip inside
//! a fixed timeout.

use crate::ports::StoreLifecycle;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::error;

/// How long a ping may take before the store counts as down.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Health probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Health endpoint payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    /// Whether the probe succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

/// Ping the store and report liveness.
///
/// Liveness = the round-trip succeeds within [`HEALTH_CHECK_TIMEOUT`].
pub async fn check(store: &dyn StoreLifecycle) -> HealthReport {
    let checked_at = Utc::now();

    let status = match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, store.ping()).await {
        Ok(Ok(())) => {
            return HealthReport {
                status: HealthStatus::Ok,
                message: None,
                checked_at,
            }
        }
        Ok(Err(err)) => err.to_string(),
        Err(_) => format!(
            "store ping timed out after {}s",
            HEALTH_CHECK_TIMEOUT.as_secs()
        ),
    };

    error!(message = %status, "Store health check failed");
    HealthReport {
        status: HealthStatus::Error,
        message: Some(status),
        checked_at,
    }
}
