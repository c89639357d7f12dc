//! # Courier Bus - Subscription Broker for Live Pushes
//!
//! An in-process, best-effort multicast broker. The fanout engine publishes
//! every durable notification here; each connected subscriber owns an
//! independent bounded queue and receives its own copy of every message
//! published to its topic after it subscribed.
//!
//! ```text
//! ┌──────────────┐                      ┌────────────────┐
//! │ Fanout Engine│    publish(key)      │ Subscriber A   │
//! │              │ ──────┐              │ (bounded queue)│
//! └──────────────┘       ▼              └────────────────┘
//!                  ┌──────────────┐             ↑
//!                  │  Topic map   │ ────────────┘
//!                  │ user:alice   │ ────────────┐
//!                  │ group:team   │             ↓
//!                  └──────────────┘     ┌────────────────┐
//!                                       │ Subscriber B   │
//!                                       └────────────────┘
//! ```
//!
//! ## Delivery contract
//!
//! - Zero subscribers: the message is dropped, nothing is buffered.
//! - No replay: a subscriber only sees messages published after it joined.
//! - No backpressure: a full subscriber queue drops the new message for
//!   that subscriber only; the publisher never blocks.
//! - Group topics apply per-subscriber tag filters at publish time.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod publisher;
pub mod subscriber;
pub mod topic;

// Re-export main types
pub use publisher::NotificationBus;
pub use subscriber::{NotificationStream, Subscription};
pub use topic::{RoutingKey, TagFilter};

/// Maximum messages buffered per subscriber before new messages are dropped
/// for that subscriber.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_QUEUE_CAPACITY, 1000);
    }
}
