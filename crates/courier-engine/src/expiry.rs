//! # Expiry Coordinator
//!
//! Computes per-record expiry timestamps from relative TTLs and installs the
//! store's two retirement rules at startup.
//!
//! The rules are independent: the rolling rule retires every record a
//! fixed duration after `created_at` (the global retention window), the
//! exact rule retires each record at its own `expire_at`. Whichever fires
//! first wins, so a sender can shorten retention below the global window
//! but never lengthen it.

use chrono::{DateTime, Utc};
use courier_store::{ExpiryField, StoreLifecycle};
use courier_types::{EngineError, TtlSpec};
use tracing::info;

/// Computes expiry timestamps and configures store retirement.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryCoordinator {
    /// Global rolling retention, seconds after `created_at`.
    rolling_retention_secs: u64,
}

impl ExpiryCoordinator {
    /// Create a coordinator with the externally-configured rolling
    /// retention window.
    #[must_use]
    pub fn new(rolling_retention_secs: u64) -> Self {
        Self {
            rolling_retention_secs,
        }
    }

    /// The global rolling retention window in seconds.
    #[must_use]
    pub fn rolling_retention_secs(&self) -> u64 {
        self.rolling_retention_secs
    }

    /// Resolve a [`TtlSpec`] into an absolute expiry timestamp.
    ///
    /// An absent TTL defaults to 2 minutes; a TTL with no unit set, or one
    /// too large to resolve into a timestamp, is a validation error. The
    /// result is always >= `now`.
    pub fn expire_at(
        &self,
        now: DateTime<Utc>,
        ttl: Option<TtlSpec>,
    ) -> Result<DateTime<Utc>, EngineError> {
        let spec = ttl.unwrap_or_else(TtlSpec::default_ttl);
        let duration = spec
            .duration()
            .ok_or_else(|| EngineError::validation("ttl is missing a unit or out of range"))?;
        now.checked_add_signed(duration)
            .ok_or_else(|| EngineError::validation("ttl exceeds the representable time range"))
    }

    /// Install both retirement rules on the store. Called once at startup.
    pub async fn configure(&self, store: &dyn StoreLifecycle) -> Result<(), EngineError> {
        store
            .configure_expiry(ExpiryField::CreatedAt, self.rolling_retention_secs)
            .await?;
        store.configure_expiry(ExpiryField::ExpireAt, 0).await?;

        info!(
            rolling_retention_secs = self.rolling_retention_secs,
            "Retirement rules installed (rolling from created_at, exact at expire_at)"
        );
        Ok(())
    }
}
