//! # Courier Engine - Notification Distribution
//!
//! Turns one send request into a durable record plus zero-or-more live
//! pushes to currently-connected subscribers.
//!
//! ```text
//! send request
//!      │
//!      ▼
//! ┌──────────────┐  resolve members  ┌────────────────┐
//! │ Fanout Engine│ ────────────────→ │ Group Registry │
//! │              │                   └────────────────┘
//! │  validate    │  persist          ┌────────────────┐
//! │  enrich      │ ────────────────→ │ Store Adapter  │
//! │  fan out     │                   └────────────────┘
//! │              │  publish          ┌────────────────┐
//! │              │ ────────────────→ │ Broker         │
//! └──────────────┘                   └────────────────┘
//! ```
//!
//! Persistence always acknowledges before anything is published, so every
//! live push corresponds to a queryable record. The converse is not
//! guaranteed: records persist even when nobody is subscribed.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod expiry;
pub mod fanout;
pub mod registry;

// Re-export main types
pub use expiry::ExpiryCoordinator;
pub use fanout::FanoutEngine;
pub use registry::GroupRegistry;
