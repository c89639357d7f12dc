//! # Store Ports (Driven Ports)
//!
//! Interfaces the engine requires a store adapter to implement.
//!
//! The fanout engine holds a [`NotificationStore`] handle and the group
//! registry holds a [`GroupStore`] handle; neither sees the other's
//! collection. Lifecycle and expiry configuration sit on their own port so
//! only the runtime wiring touches them.

use async_trait::async_trait;
use courier_types::{Group, Notification, NotificationId, StoreError};

/// Which timestamp field an expiry rule is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryField {
    /// Rolling retirement a fixed duration after creation.
    CreatedAt,
    /// Exact retirement at each record's own expiry timestamp.
    ExpireAt,
}

/// Typed notification persistence.
///
/// Production: a document-database adapter. Testing and embedding:
/// [`crate::MemoryStore`].
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert one recipient copy.
    async fn insert_recipient(&self, notification: Notification) -> Result<(), StoreError>;

    /// Insert recipient copies in a single batched call.
    ///
    /// Atomicity across documents is not required, but the batch must be
    /// one store round-trip to bound fanout latency.
    async fn insert_recipients(&self, batch: Vec<Notification>) -> Result<(), StoreError>;

    /// Insert the group-level summary record of a group send.
    async fn insert_group_record(&self, notification: Notification) -> Result<(), StoreError>;

    /// Recipient copies for `user` with the exact `sleep` value, excluding
    /// retired records.
    async fn find_for_user(&self, user: &str, sleep: bool) -> Result<Vec<Notification>, StoreError>;

    /// Group-level records for `group_name`, excluding retired records.
    ///
    /// A non-empty `tags` argument keeps only records whose tag set
    /// overlaps it (set-overlap, not exact match).
    async fn find_for_group(
        &self,
        group_name: &str,
        tags: &[String],
    ) -> Result<Vec<Notification>, StoreError>;

    /// Atomically negate the `sleep` flag of the matching recipient copy.
    ///
    /// Expressed as a single store-side update, not a read-modify-write.
    /// Returns whether a record matched.
    async fn toggle_sleep(&self, id: NotificationId) -> Result<bool, StoreError>;
}

/// Group membership persistence.
///
/// Every mutation is a single-document atomic update; groups are
/// independent, so no cross-document transaction is needed.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Insert a new group document.
    async fn insert_group(&self, group: Group) -> Result<(), StoreError>;

    /// Look up a group by name.
    async fn find_group(&self, group_name: &str) -> Result<Option<Group>, StoreError>;

    /// Set-insert `user` into the group's member set.
    ///
    /// Returns whether the group matched; inserting an existing member is
    /// a matched no-op.
    async fn add_member(&self, group_name: &str, user: &str) -> Result<bool, StoreError>;

    /// Set-remove `user` from the group's member set.
    ///
    /// Returns whether the group matched; removing a non-member is a
    /// matched no-op.
    async fn remove_member(&self, group_name: &str, user: &str) -> Result<bool, StoreError>;
}

/// Store connection lifecycle and retirement-rule configuration.
#[async_trait]
pub trait StoreLifecycle: Send + Sync {
    /// Establish the connection. Ops before `connect` fail with
    /// [`StoreError::Unavailable`].
    async fn connect(&self) -> Result<(), StoreError>;

    /// Release the connection. Idempotent.
    async fn disconnect(&self) -> Result<(), StoreError>;

    /// Round-trip liveness probe.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Install one retirement rule: records retire `after_seconds` after
    /// the given field. Called once per rule at startup.
    async fn configure_expiry(
        &self,
        field: ExpiryField,
        after_seconds: u64,
    ) -> Result<(), StoreError>;
}
