//! # Service Wiring
//!
//! Builds the store, broker, registry and engine in dependency order and
//! hands transport adapters their entry points.

use crate::container::config::CourierConfig;
use courier_bus::NotificationBus;
use courier_engine::{ExpiryCoordinator, FanoutEngine, GroupRegistry};
use courier_store::MemoryStore;
use std::sync::Arc;

/// All initialized services, in one place.
///
/// The store handle is kept concretely for lifecycle control; the engine
/// and registry only ever see it through their ports.
pub struct ServiceContainer {
    store: Arc<MemoryStore>,
    bus: Arc<NotificationBus>,
    registry: Arc<GroupRegistry>,
    engine: Arc<FanoutEngine>,
    expiry: ExpiryCoordinator,
}

impl ServiceContainer {
    /// Wire services from configuration. Leaf components first: store and
    /// broker, then the registry, then the engine over all of them.
    #[must_use]
    pub fn build(config: &CourierConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let bus = Arc::new(NotificationBus::with_capacity(
            config.broker.queue_capacity,
        ));
        let registry = Arc::new(GroupRegistry::new(store.clone()));
        let expiry = ExpiryCoordinator::new(config.retention.created_at_ttl_secs);
        let engine = Arc::new(FanoutEngine::new(
            store.clone(),
            registry.clone(),
            bus.clone(),
            expiry,
        ));

        Self {
            store,
            bus,
            registry,
            engine,
            expiry,
        }
    }

    /// The store handle, for lifecycle control and health checks.
    #[must_use]
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// The broker, for transport adapters opening subscriptions.
    #[must_use]
    pub fn bus(&self) -> &Arc<NotificationBus> {
        &self.bus
    }

    /// The group registry's four operations.
    #[must_use]
    pub fn registry(&self) -> &Arc<GroupRegistry> {
        &self.registry
    }

    /// The fanout engine's mutation and query operations.
    #[must_use]
    pub fn engine(&self) -> &Arc<FanoutEngine> {
        &self.engine
    }

    /// The expiry coordinator, for installing retirement rules.
    #[must_use]
    pub fn expiry(&self) -> ExpiryCoordinator {
        self.expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_store::StoreLifecycle;

    #[tokio::test]
    async fn test_container_wires_a_working_engine() {
        let container = ServiceContainer::build(&CourierConfig::default());
        container.store().connect().await.unwrap();

        container
            .registry()
            .create_group("team", vec!["a".into()])
            .await
            .unwrap();
        container
            .engine()
            .send_to_group("team", "sys", "hi", Vec::new(), None)
            .await
            .unwrap();

        let listed = container
            .engine()
            .list_user_notifications("a", false)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_broker_capacity_comes_from_config() {
        let mut config = CourierConfig::default();
        config.broker.queue_capacity = 7;

        let container = ServiceContainer::build(&config);
        assert_eq!(container.bus().capacity(), 7);
    }
}
