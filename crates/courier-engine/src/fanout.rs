//! # Fanout Engine
//!
//! Orchestrates a send: validate, persist, resolve membership, publish.
//!
//! Ordering invariant: the durable write acknowledges before the matching
//! live push goes out. A storage failure therefore surfaces before anyone
//! was pushed to, so mutations that fail leave no partial state observable
//! through queries. Live pushes already delivered are never rolled back.

use crate::expiry::ExpiryCoordinator;
use crate::registry::{require_non_empty, GroupRegistry};
use courier_bus::{NotificationBus, RoutingKey};
use courier_store::NotificationStore;
use courier_types::{EngineError, Notification, NotificationId, TtlSpec};
use std::sync::Arc;
use tracing::{debug, info};

/// The notification distribution engine.
///
/// Owns notification creation; shares the store only through the typed
/// [`NotificationStore`] port and reaches group membership only through
/// the registry.
pub struct FanoutEngine {
    store: Arc<dyn NotificationStore>,
    registry: Arc<GroupRegistry>,
    bus: Arc<NotificationBus>,
    expiry: ExpiryCoordinator,
}

impl FanoutEngine {
    /// Wire an engine from its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn NotificationStore>,
        registry: Arc<GroupRegistry>,
        bus: Arc<NotificationBus>,
        expiry: ExpiryCoordinator,
    ) -> Self {
        Self {
            store,
            registry,
            bus,
            expiry,
        }
    }

    /// Send a notification to one user.
    ///
    /// Persists a recipient copy, then publishes it to `user:<to_user>`.
    /// Returns the new record's id.
    pub async fn send_to_user(
        &self,
        to_user: &str,
        from_user: &str,
        payload: &str,
        ttl: Option<TtlSpec>,
    ) -> Result<NotificationId, EngineError> {
        require_non_empty("to_user", to_user)?;
        require_non_empty("from_user", from_user)?;
        require_non_empty("payload", payload)?;

        let created_at = chrono::Utc::now();
        let expire_at = self.expiry.expire_at(created_at, ttl)?;
        let notification =
            Notification::recipient_copy(to_user, from_user, payload, created_at, expire_at);

        self.store.insert_recipient(notification.clone()).await?;
        let delivered = self
            .bus
            .publish(&RoutingKey::user(to_user), &notification);

        info!(
            notification_id = %notification.id,
            to_user,
            from_user,
            delivered,
            "Notification sent to user"
        );
        Ok(notification.id)
    }

    /// Send a notification to every member of a group.
    ///
    /// Resolves membership first (an absent group fails before any write),
    /// persists one recipient copy per member in a single batched call and
    /// pushes each to its `user:<member>` topic regardless of tags, then
    /// persists the group-level summary and publishes it to
    /// `group:<group_name>`, where per-subscriber tag filters apply.
    ///
    /// All resulting records share one `created_at`/`expire_at` pair so
    /// clients can correlate the logical send. Returns the summary
    /// record's id.
    pub async fn send_to_group(
        &self,
        group_name: &str,
        from_user: &str,
        payload: &str,
        tags: Vec<String>,
        ttl: Option<TtlSpec>,
    ) -> Result<NotificationId, EngineError> {
        require_non_empty("group_name", group_name)?;
        require_non_empty("from_user", from_user)?;
        require_non_empty("payload", payload)?;

        let members = self.registry.resolve(group_name).await?;

        let created_at = chrono::Utc::now();
        let expire_at = self.expiry.expire_at(created_at, ttl)?;

        let copies: Vec<Notification> = members
            .iter()
            .map(|member| {
                Notification::recipient_copy(member, from_user, payload, created_at, expire_at)
                    .with_group(group_name)
            })
            .collect();

        if !copies.is_empty() {
            self.store.insert_recipients(copies.clone()).await?;
        }
        for copy in &copies {
            // Personal copies reach every member; tags only steer the
            // group-level publish below.
            let member = copy.recipient_user.as_deref().unwrap_or_default();
            self.bus.publish(&RoutingKey::user(member), copy);
        }

        let summary = Notification::group_summary(
            group_name, from_user, payload, tags, created_at, expire_at,
        );
        self.store.insert_group_record(summary.clone()).await?;
        let delivered = self
            .bus
            .publish(&RoutingKey::group(group_name), &summary);

        info!(
            notification_id = %summary.id,
            group_name,
            from_user,
            members = copies.len(),
            delivered,
            "Notification sent to group"
        );
        Ok(summary.id)
    }

    /// Atomically flip the `sleep` flag on one recipient copy.
    ///
    /// A negate, not a set: retrying the same toggle flips again.
    pub async fn sleep_toggle(&self, id: NotificationId) -> Result<(), EngineError> {
        if !self.store.toggle_sleep(id).await? {
            return Err(EngineError::NotificationNotFound { id });
        }
        debug!(notification_id = %id, "Sleep flag toggled");
        Ok(())
    }

    /// Recipient copies for `user`, filtered by the exact `sleep` value.
    pub async fn list_user_notifications(
        &self,
        user: &str,
        sleep: bool,
    ) -> Result<Vec<Notification>, EngineError> {
        require_non_empty("user", user)?;
        Ok(self.store.find_for_user(user, sleep).await?)
    }

    /// Group-level records for `group_name`; non-empty `tags` keeps only
    /// records whose tag set overlaps it.
    pub async fn list_group_notifications(
        &self,
        group_name: &str,
        tags: &[String],
    ) -> Result<Vec<Notification>, EngineError> {
        require_non_empty("group_name", group_name)?;
        Ok(self.store.find_for_group(group_name, tags).await?)
    }
}
