//! # Runtime Configuration
//!
//! Configuration for the courier node, with sane defaults and
//! environment-variable overrides.
//!
//! ## Environment Variables
//!
//! - `COURIER_HOSTNAME`: bind address for transport adapters
//! - `COURIER_PORT`: port for transport adapters
//! - `COURIER_CREATED_AT_TTL_SECS`: global rolling retention window
//! - `COURIER_QUEUE_CAPACITY`: per-subscriber broker queue capacity

use std::env;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct CourierConfig {
    /// Transport listener configuration.
    pub server: ServerConfig,
    /// Retention configuration.
    pub retention: RetentionConfig,
    /// Broker configuration.
    pub broker: BrokerConfig,
}

impl CourierConfig {
    /// Defaults overridden by any `COURIER_*` environment variables set.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(hostname) = env::var("COURIER_HOSTNAME") {
            config.server.hostname = hostname;
        }
        if let Some(port) = parse_env("COURIER_PORT") {
            config.server.port = port;
        }
        if let Some(secs) = parse_env("COURIER_CREATED_AT_TTL_SECS") {
            config.retention.created_at_ttl_secs = secs;
        }
        if let Some(capacity) = parse_env("COURIER_QUEUE_CAPACITY") {
            config.broker.queue_capacity = capacity;
        }

        config
    }

    /// Reject configurations the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention.created_at_ttl_secs == 0 {
            return Err(ConfigError::ZeroRetention);
        }
        if self.broker.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Configuration errors.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The rolling retention window must be non-zero.
    ZeroRetention,
    /// Subscriber queues must hold at least one message.
    ZeroQueueCapacity,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroRetention => {
                write!(f, "COURIER_CREATED_AT_TTL_SECS must be greater than zero")
            }
            Self::ZeroQueueCapacity => {
                write!(f, "COURIER_QUEUE_CAPACITY must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Transport listener configuration, consumed by the API front-ends.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub hostname: String,
    /// Listener port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

/// Retention configuration.
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Global rolling retention: records retire this many seconds after
    /// `created_at`, whatever their own TTL says. Default: one day.
    pub created_at_ttl_secs: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            created_at_ttl_secs: 86_400,
        }
    }
}

/// Broker configuration.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Per-subscriber queue capacity before new messages are dropped for
    /// that subscriber.
    pub queue_capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: courier_bus::DEFAULT_QUEUE_CAPACITY,
        }
    }
}
