//! # Courier Test Suite
//!
//! Unified test crate for cross-crate flows.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs          # End-to-end fanout scenarios
//!     └── subscriptions.rs  # Broker behavior under churn and load
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p courier-tests
//!
//! # By category
//! cargo test -p courier-tests integration::
//! ```

pub mod integration;
