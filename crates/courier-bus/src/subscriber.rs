//! # Notification Subscriber
//!
//! The receiving side of the broker: a handle over one bounded delivery
//! queue, plus a `Stream` wrapper for transport adapters.

use crate::publisher::{remove_slot, TopicMap};
use crate::topic::TagFilter;
use courier_types::Notification;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;

/// A live subscription to one topic.
///
/// Produces a lazy, infinite, non-restartable sequence of notifications
/// published after the subscription was created. Dropping the handle
/// unregisters it from the broker; the subscriber list never accumulates
/// dead entries.
pub struct Subscription {
    /// Slot id within the bus.
    id: u64,

    /// String form of the routing key.
    topic_key: String,

    /// Filter this subscription was created with.
    filter: TagFilter,

    /// The bounded delivery queue.
    rx: mpsc::Receiver<Notification>,

    /// Topic registry, for cleanup on drop.
    topics: Arc<TopicMap>,
}

impl Subscription {
    pub(crate) fn new(
        id: u64,
        topic_key: String,
        filter: TagFilter,
        rx: mpsc::Receiver<Notification>,
        topics: Arc<TopicMap>,
    ) -> Self {
        Self {
            id,
            topic_key,
            filter,
            rx,
            topics,
        }
    }

    /// Wait for the next notification.
    ///
    /// Returns `None` once the subscription has been unregistered and its
    /// queue drained. Never suspends while holding broker locks.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    /// Take the next notification without waiting, if one is queued.
    pub fn try_recv(&mut self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    /// Unregister from the broker.
    ///
    /// Equivalent to dropping the handle; idempotent.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// The topic this subscription listens on, in `kind:name` form.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic_key
    }

    /// The filter this subscription was created with.
    #[must_use]
    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    /// Turn this subscription into a [`Stream`] of notifications.
    #[must_use]
    pub fn into_stream(self) -> NotificationStream {
        NotificationStream { subscription: self }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        remove_slot(&self.topics, &self.topic_key, self.id);
    }
}

/// `Stream` adapter over a [`Subscription`].
///
/// Lets transport adapters drive delivery with stream combinators; the
/// underlying subscription is unregistered when the stream is dropped.
pub struct NotificationStream {
    subscription: Subscription,
}

impl NotificationStream {
    /// The topic this stream listens on.
    #[must_use]
    pub fn topic(&self) -> &str {
        self.subscription.topic()
    }
}

impl Stream for NotificationStream {
    type Item = Notification;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().subscription.rx.poll_recv(cx)
    }
}
