//! # Core Domain Entities
//!
//! Notifications, groups and TTL specifications as carried by the fanout
//! engine, the broker and the store adapters.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a notification.
///
/// Backed by a UUIDv7, so ids sort by creation time and the creation
/// instant can be recovered from the id itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Generate a fresh, time-ordered id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// The creation instant embedded in the id, at millisecond precision.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let (secs, nanos) = self.0.get_timestamp()?.to_unix();
        Utc.timestamp_opt(secs as i64, nanos).single()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for NotificationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A notification record, both persisted and pushed live.
///
/// Two shapes share this type:
///
/// - **Recipient copy**: `recipient_user` is set, `sleep` is `Some(false)`
///   at creation, `tags` is always empty.
/// - **Group summary**: `recipient_user` and `sleep` are absent,
///   `group_name` is set and `tags` carries the sender's routing tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique, immutable id.
    pub id: NotificationId,

    /// Target user for recipient copies; absent on group summaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_user: Option<String>,

    /// Sender identity.
    pub from_user: String,

    /// Present iff this record resulted from a group send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,

    /// Opaque application content.
    pub payload: String,

    /// Per-recipient snoozed flag; absent on group summaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep: Option<bool>,

    /// Sender-chosen routing tags; only meaningful on group summaries.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Absolute retirement time, always >= `created_at`.
    pub expire_at: DateTime<Utc>,

    /// Creation instant, immutable.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build a recipient copy addressed to `recipient_user`.
    #[must_use]
    pub fn recipient_copy(
        recipient_user: impl Into<String>,
        from_user: impl Into<String>,
        payload: impl Into<String>,
        created_at: DateTime<Utc>,
        expire_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::generate(),
            recipient_user: Some(recipient_user.into()),
            from_user: from_user.into(),
            group_name: None,
            payload: payload.into(),
            sleep: Some(false),
            tags: Vec::new(),
            expire_at,
            created_at,
        }
    }

    /// Build the group-level summary record for a group send.
    #[must_use]
    pub fn group_summary(
        group_name: impl Into<String>,
        from_user: impl Into<String>,
        payload: impl Into<String>,
        tags: Vec<String>,
        created_at: DateTime<Utc>,
        expire_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::generate(),
            recipient_user: None,
            from_user: from_user.into(),
            group_name: Some(group_name.into()),
            payload: payload.into(),
            sleep: None,
            tags,
            expire_at,
            created_at,
        }
    }

    /// Attach a group name to a recipient copy.
    #[must_use]
    pub fn with_group(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }
}

/// A named group of users.
///
/// Membership is a set: `users` carries no duplicates and order is
/// irrelevant for resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group key.
    pub group_name: String,

    /// Deduplicated member set.
    pub users: Vec<String>,
}

impl Group {
    /// Create a group, deduplicating `initial_members` while preserving
    /// first-seen order.
    #[must_use]
    pub fn new(group_name: impl Into<String>, initial_members: Vec<String>) -> Self {
        let mut users: Vec<String> = Vec::with_capacity(initial_members.len());
        for member in initial_members {
            if !users.contains(&member) {
                users.push(member);
            }
        }
        Self {
            group_name: group_name.into(),
            users,
        }
    }

    /// Whether `user` is a member.
    #[must_use]
    pub fn contains(&self, user: &str) -> bool {
        self.users.iter().any(|u| u == user)
    }
}

/// A relative time-to-live, converted to an absolute `expire_at` at send
/// time.
///
/// Exactly one unit wins, priority days > hours > mins. A value with no
/// unit set is malformed; an entirely absent value defaults to 2 minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mins: Option<u64>,
}

impl TtlSpec {
    /// The default TTL applied when a send specifies none: 2 minutes.
    #[must_use]
    pub fn default_ttl() -> Self {
        Self {
            mins: Some(2),
            ..Self::default()
        }
    }

    /// Resolve the winning unit into a duration.
    ///
    /// Returns `None` when no unit is set, or when the winning unit is too
    /// large to represent as a duration.
    #[must_use]
    pub fn duration(&self) -> Option<chrono::Duration> {
        let seconds = if let Some(days) = self.days {
            days.checked_mul(86_400)?
        } else if let Some(hours) = self.hours {
            hours.checked_mul(3_600)?
        } else {
            self.mins?.checked_mul(60)?
        };

        chrono::Duration::try_seconds(i64::try_from(seconds).ok()?)
    }
}
