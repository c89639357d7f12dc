//! # Courier Node Runtime
//!
//! The entry point for the courier notification node.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults + `COURIER_*` environment overrides)
//! 2. Validate configuration
//! 3. Wire services in dependency order (store, broker, registry, engine)
//! 4. Connect the store and install the two retirement rules
//! 5. Probe store health and signal ready
//!
//! ## Shutdown
//!
//! A watch-channel signal drains the runtime: the store disconnects and
//! every open subscription unregisters as its handle drops.

pub mod container;

use anyhow::{Context, Result};
use courier_store::{health, HealthReport, StoreLifecycle};
use tracing::info;

use crate::container::{CourierConfig, ServiceContainer};

/// The runtime orchestrating the courier services.
pub struct CourierRuntime {
    /// Wired services.
    container: ServiceContainer,
    /// Shutdown signal sender.
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl CourierRuntime {
    /// Wire and start the runtime: connect the store and install the
    /// retirement rules.
    pub async fn start(config: CourierConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let container = ServiceContainer::build(&config);
        container
            .store()
            .connect()
            .await
            .context("store connection failed")?;
        container
            .expiry()
            .configure(container.store().as_ref())
            .await
            .context("installing retirement rules failed")?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        info!(
            hostname = %config.server.hostname,
            port = config.server.port,
            retention_secs = config.retention.created_at_ttl_secs,
            "Courier runtime started"
        );

        Ok(Self {
            container,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// The wired services, for transport adapters.
    #[must_use]
    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    /// Probe store liveness (2-second round-trip budget).
    pub async fn health(&self) -> HealthReport {
        health::check(self.container.store().as_ref()).await
    }

    /// A handle transport tasks can watch for shutdown.
    #[must_use]
    pub fn shutdown_signal(&self) -> tokio::sync::watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Block until shutdown is requested.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.shutdown_rx.clone();
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Signal shutdown and release resources.
    pub async fn shutdown(&self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        self.container
            .store()
            .disconnect()
            .await
            .context("store disconnect failed")?;
        info!("Courier runtime stopped");
        Ok(())
    }
}
