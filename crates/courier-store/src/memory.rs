//! # In-Memory Store Adapter
//!
//! Implements all three store ports over process memory. Collections get
//! independent locks, so notification traffic never contends with group
//! mutations. Retirement rules are enforced when records are read: once
//! either rule fires for a record, no query returns it again.

use crate::ports::{ExpiryField, GroupStore, NotificationStore, StoreLifecycle};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use courier_types::{Group, Notification, NotificationId, StoreError};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Configured retirement rules.
#[derive(Debug, Clone, Copy, Default)]
struct ExpiryRules {
    /// Seconds after `created_at` (the global rolling retention).
    after_created_at: Option<u64>,
    /// Seconds after `expire_at` (0 = exactly at `expire_at`).
    after_expire_at: Option<u64>,
}

impl ExpiryRules {
    /// Whether a record is still reachable at `now`. Either rule firing
    /// retires the record. A deadline past the representable time range
    /// never fires.
    fn is_live(&self, notification: &Notification, now: DateTime<Utc>) -> bool {
        if let Some(deadline) = self
            .after_created_at
            .and_then(rule_window)
            .and_then(|window| notification.created_at.checked_add_signed(window))
        {
            if now >= deadline {
                return false;
            }
        }
        if let Some(deadline) = self
            .after_expire_at
            .and_then(rule_window)
            .and_then(|window| notification.expire_at.checked_add_signed(window))
        {
            if now >= deadline {
                return false;
            }
        }
        true
    }
}

/// Checked conversion of a rule's seconds into a duration.
fn rule_window(secs: u64) -> Option<Duration> {
    Duration::try_seconds(i64::try_from(secs).ok()?)
}

/// In-memory document store.
///
/// Keyed by notification id, which is time-ordered, so query results come
/// back in creation order.
pub struct MemoryStore {
    /// Recipient copies, one per targeted user.
    recipients: RwLock<BTreeMap<NotificationId, Notification>>,

    /// Group-level summary records.
    group_records: RwLock<BTreeMap<NotificationId, Notification>>,

    /// Group documents by name.
    groups: RwLock<HashMap<String, Group>>,

    /// Retirement rules installed at startup.
    expiry: RwLock<ExpiryRules>,

    /// Connection state; ops fail until `connect`.
    connected: AtomicBool,
}

impl MemoryStore {
    /// Create a disconnected store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            recipients: RwLock::new(BTreeMap::new()),
            group_records: RwLock::new(BTreeMap::new()),
            groups: RwLock::new(HashMap::new()),
            expiry: RwLock::new(ExpiryRules::default()),
            connected: AtomicBool::new(false),
        }
    }

    /// Create a store that is already connected.
    #[must_use]
    pub fn connected() -> Self {
        let store = Self::new();
        store.connected.store(true, Ordering::SeqCst);
        store
    }

    fn ensure_connected(&self) -> Result<(), StoreError> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("store is not connected".into()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert_recipient(&self, notification: Notification) -> Result<(), StoreError> {
        self.ensure_connected()?;
        self.recipients
            .write()
            .insert(notification.id, notification);
        Ok(())
    }

    async fn insert_recipients(&self, batch: Vec<Notification>) -> Result<(), StoreError> {
        self.ensure_connected()?;
        let mut recipients = self.recipients.write();
        for notification in batch {
            recipients.insert(notification.id, notification);
        }
        Ok(())
    }

    async fn insert_group_record(&self, notification: Notification) -> Result<(), StoreError> {
        self.ensure_connected()?;
        self.group_records
            .write()
            .insert(notification.id, notification);
        Ok(())
    }

    async fn find_for_user(&self, user: &str, sleep: bool) -> Result<Vec<Notification>, StoreError> {
        self.ensure_connected()?;
        let now = Utc::now();
        let rules = *self.expiry.read();

        Ok(self
            .recipients
            .read()
            .values()
            .filter(|n| {
                n.recipient_user.as_deref() == Some(user)
                    && n.sleep == Some(sleep)
                    && rules.is_live(n, now)
            })
            .cloned()
            .collect())
    }

    async fn find_for_group(
        &self,
        group_name: &str,
        tags: &[String],
    ) -> Result<Vec<Notification>, StoreError> {
        self.ensure_connected()?;
        let now = Utc::now();
        let rules = *self.expiry.read();

        Ok(self
            .group_records
            .read()
            .values()
            .filter(|n| {
                n.group_name.as_deref() == Some(group_name)
                    && (tags.is_empty() || n.tags.iter().any(|t| tags.contains(t)))
                    && rules.is_live(n, now)
            })
            .cloned()
            .collect())
    }

    async fn toggle_sleep(&self, id: NotificationId) -> Result<bool, StoreError> {
        self.ensure_connected()?;
        let now = Utc::now();
        let rules = *self.expiry.read();

        let mut recipients = self.recipients.write();
        match recipients.get_mut(&id) {
            Some(notification) if rules.is_live(notification, now) => {
                let flipped = !notification.sleep.unwrap_or(false);
                notification.sleep = Some(flipped);
                debug!(notification_id = %id, sleep = flipped, "Sleep flag toggled");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn insert_group(&self, group: Group) -> Result<(), StoreError> {
        self.ensure_connected()?;
        let mut groups = self.groups.write();
        if groups.contains_key(&group.group_name) {
            return Err(StoreError::Backend(format!(
                "duplicate key: group {}",
                group.group_name
            )));
        }
        groups.insert(group.group_name.clone(), group);
        Ok(())
    }

    async fn find_group(&self, group_name: &str) -> Result<Option<Group>, StoreError> {
        self.ensure_connected()?;
        Ok(self.groups.read().get(group_name).cloned())
    }

    async fn add_member(&self, group_name: &str, user: &str) -> Result<bool, StoreError> {
        self.ensure_connected()?;
        let mut groups = self.groups.write();
        let Some(group) = groups.get_mut(group_name) else {
            return Ok(false);
        };
        if !group.contains(user) {
            group.users.push(user.to_string());
        }
        Ok(true)
    }

    async fn remove_member(&self, group_name: &str, user: &str) -> Result<bool, StoreError> {
        self.ensure_connected()?;
        let mut groups = self.groups.write();
        let Some(group) = groups.get_mut(group_name) else {
            return Ok(false);
        };
        group.users.retain(|u| u != user);
        Ok(true)
    }
}

#[async_trait]
impl StoreLifecycle for MemoryStore {
    async fn connect(&self) -> Result<(), StoreError> {
        self.connected.store(true, Ordering::SeqCst);
        info!("Memory store connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        self.connected.store(false, Ordering::SeqCst);
        info!("Memory store disconnected");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_connected()
    }

    async fn configure_expiry(
        &self,
        field: ExpiryField,
        after_seconds: u64,
    ) -> Result<(), StoreError> {
        self.ensure_connected()?;
        if rule_window(after_seconds).is_none() {
            return Err(StoreError::Backend(format!(
                "expiry rule out of range: {after_seconds}s after {field:?}"
            )));
        }
        let mut expiry = self.expiry.write();
        match field {
            ExpiryField::CreatedAt => expiry.after_created_at = Some(after_seconds),
            ExpiryField::ExpireAt => expiry.after_expire_at = Some(after_seconds),
        }
        info!(?field, after_seconds, "Expiry rule installed");
        Ok(())
    }
}
