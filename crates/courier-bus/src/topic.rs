//! # Routing Keys and Tag Filters
//!
//! A topic is identified by a routing key: `user:<name>` for personal
//! delivery, `group:<group_name>` for group delivery. Group subscribers may
//! additionally carry a tag filter, evaluated against each published
//! message's tags.

use std::fmt;

/// Identifies a broker delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutingKey {
    /// Personal delivery channel for one user.
    User(String),
    /// Group-level delivery channel. Tags never participate in the key.
    Group(String),
}

impl RoutingKey {
    /// Personal topic for `user`.
    #[must_use]
    pub fn user(user: impl Into<String>) -> Self {
        Self::User(user.into())
    }

    /// Group topic for `group_name`.
    #[must_use]
    pub fn group(group_name: impl Into<String>) -> Self {
        Self::Group(group_name.into())
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(user) => write!(f, "user:{user}"),
            Self::Group(group) => write!(f, "group:{group}"),
        }
    }
}

/// Per-subscription tag filter, evaluated once per subscriber per publish.
///
/// A subscription with filter tags `F` receives a message carrying tags `T`
/// iff `F` is empty (receive everything), `T` is empty (untagged broadcast,
/// delivered to everyone), or `F` and `T` overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    tags: Vec<String>,
}

impl TagFilter {
    /// A filter that accepts every message.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter that accepts messages carrying any of `tags`.
    ///
    /// An empty `tags` list is equivalent to [`TagFilter::all`].
    #[must_use]
    pub fn any_of(tags: Vec<String>) -> Self {
        Self { tags }
    }

    /// The filter's tag set.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether a message carrying `message_tags` passes this filter.
    #[must_use]
    pub fn matches(&self, message_tags: &[String]) -> bool {
        if self.tags.is_empty() || message_tags.is_empty() {
            return true;
        }
        self.tags.iter().any(|t| message_tags.contains(t))
    }
}
