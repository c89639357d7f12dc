//! # Courier Types - Shared Domain Entities
//!
//! Defines the entities that flow between the fanout engine, the
//! subscription broker and the store adapters, plus the error taxonomy
//! every component reports through.
//!
//! ## Clusters
//!
//! - **Notifications**: `Notification`, `NotificationId`, `TtlSpec`
//! - **Groups**: `Group`
//! - **Errors**: `EngineError`, `StoreError`

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod entities;
pub mod errors;

// Re-export main types
pub use entities::{Group, Notification, NotificationId, TtlSpec};
pub use errors::{EngineError, StoreError};
