//! # Notification Publisher
//!
//! The publishing side of the broker: a concurrent topic map where each
//! topic owns its subscriber list.

use crate::subscriber::Subscription;
use crate::topic::{RoutingKey, TagFilter};
use crate::DEFAULT_QUEUE_CAPACITY;
use courier_types::Notification;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// One registered subscriber of a topic.
pub(crate) struct SubscriberSlot {
    /// Unique id within the bus, for targeted removal.
    pub(crate) id: u64,
    /// Tag filter evaluated at publish time.
    pub(crate) filter: TagFilter,
    /// Bounded delivery queue; a full queue drops new messages.
    pub(crate) tx: mpsc::Sender<Notification>,
}

/// A topic's subscriber list.
#[derive(Default)]
pub(crate) struct TopicEntry {
    pub(crate) subscribers: Vec<SubscriberSlot>,
}

/// Shared topic registry, keyed by the routing key's string form.
pub(crate) type TopicMap = DashMap<String, TopicEntry>;

/// In-memory, single-process notification broker.
///
/// Suitable for single-node operation; cross-process fan-out would use a
/// different implementation behind the same surface.
pub struct NotificationBus {
    /// Topic registry. Each entry synchronizes its own subscriber list.
    topics: Arc<TopicMap>,

    /// Source of subscriber slot ids.
    next_subscriber_id: AtomicU64,

    /// Total publish calls accepted.
    messages_published: AtomicU64,

    /// Per-subscriber queue capacity.
    capacity: usize,
}

impl NotificationBus {
    /// Create a bus with the default per-subscriber queue capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a bus with a specific per-subscriber queue capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: Arc::new(DashMap::new()),
            next_subscriber_id: AtomicU64::new(1),
            messages_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Publish a notification to every current subscriber of `key`.
    ///
    /// Fire-and-forget: with zero subscribers the message is dropped. A
    /// subscriber whose queue is full misses this message; the publisher
    /// never waits. Returns the number of queues the message landed in.
    pub fn publish(&self, key: &RoutingKey, notification: &Notification) -> usize {
        self.messages_published.fetch_add(1, Ordering::Relaxed);

        let topic_key = key.to_string();
        let Some(mut topic) = self.topics.get_mut(&topic_key) else {
            debug!(topic = %topic_key, "Message dropped (no subscribers)");
            return 0;
        };

        let mut delivered = 0;
        let mut closed_slots = false;

        for slot in &topic.subscribers {
            if !slot.filter.matches(&notification.tags) {
                continue;
            }
            match slot.tx.try_send(notification.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        topic = %topic_key,
                        subscriber = slot.id,
                        "Subscriber queue full, message dropped for this subscriber"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => closed_slots = true,
            }
        }

        // Receivers dropped without unsubscribing leave closed senders.
        if closed_slots {
            topic.subscribers.retain(|slot| !slot.tx.is_closed());
        }
        let now_empty = topic.subscribers.is_empty();
        drop(topic);
        if now_empty {
            self.topics
                .remove_if(&topic_key, |_, entry| entry.subscribers.is_empty());
        }

        debug!(
            topic = %topic_key,
            notification_id = %notification.id,
            delivered,
            "Notification published"
        );
        delivered
    }

    /// Register a new independent subscriber of `key`.
    ///
    /// The returned handle yields every message published to the topic
    /// after this call, subject to `filter`. Dropping the handle
    /// unregisters it.
    #[must_use]
    pub fn subscribe(&self, key: &RoutingKey, filter: TagFilter) -> Subscription {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(self.capacity);
        let topic_key = key.to_string();

        self.topics
            .entry(topic_key.clone())
            .or_default()
            .subscribers
            .push(SubscriberSlot {
                id,
                filter: filter.clone(),
                tx,
            });

        debug!(topic = %topic_key, subscriber = id, "New subscription created");

        Subscription::new(id, topic_key, filter, rx, Arc::clone(&self.topics))
    }

    /// Number of current subscribers of `key`.
    #[must_use]
    pub fn subscriber_count(&self, key: &RoutingKey) -> usize {
        self.topics
            .get(&key.to_string())
            .map_or(0, |topic| topic.subscribers.len())
    }

    /// Number of topics with at least one subscriber.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Total publish calls accepted since creation.
    #[must_use]
    pub fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }

    /// Per-subscriber queue capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove one subscriber slot, dropping the topic entry when it empties.
///
/// Idempotent: removing an already-removed slot is a no-op.
pub(crate) fn remove_slot(topics: &TopicMap, topic_key: &str, id: u64) {
    let Some(mut topic) = topics.get_mut(topic_key) else {
        return;
    };
    topic.subscribers.retain(|slot| slot.id != id);
    let now_empty = topic.subscribers.is_empty();
    drop(topic);
    if now_empty {
        topics.remove_if(topic_key, |_, entry| entry.subscribers.is_empty());
    }
    debug!(topic = %topic_key, subscriber = id, "Subscription removed");
}
