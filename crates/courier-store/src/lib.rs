//! # Courier Store - Persistence Ports and Adapters
//!
//! The document store itself is an external collaborator; this crate pins
//! down its contract. Three ports cover the concerns the engine needs:
//!
//! - [`NotificationStore`] - typed notification persistence and queries
//! - [`GroupStore`] - single-document atomic group membership updates
//! - [`StoreLifecycle`] - explicit connect/disconnect, ping and the two
//!   expiry-rule installations
//!
//! [`MemoryStore`] implements all three for embedding and tests, enforcing
//! both retirement rules at read time the way a document database's TTL
//! monitor would make retired records unreachable.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod health;
pub mod memory;
pub mod ports;

// Re-export main types
pub use health::{HealthReport, HealthStatus, HEALTH_CHECK_TIMEOUT};
pub use memory::MemoryStore;
pub use ports::{ExpiryField, GroupStore, NotificationStore, StoreLifecycle};
