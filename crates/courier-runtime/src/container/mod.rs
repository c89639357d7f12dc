//! # Service Container
//!
//! Configuration plus dependency wiring: every component receives its
//! collaborators explicitly, nothing reaches for a process-wide singleton.

pub mod config;
pub mod services;

pub use config::{ConfigError, CourierConfig};
pub use services::ServiceContainer;
