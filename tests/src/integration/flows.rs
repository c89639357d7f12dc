//! # Integration Test Flows
//!
//! End-to-end fanout: registry, engine, store and broker working together
//! the way the runtime wires them.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use courier_bus::{NotificationBus, RoutingKey, TagFilter};
    use courier_engine::{ExpiryCoordinator, FanoutEngine, GroupRegistry};
    use courier_runtime::container::CourierConfig;
    use courier_runtime::CourierRuntime;
    use courier_store::{MemoryStore, StoreLifecycle};
    use courier_types::TtlSpec;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Stack {
        engine: FanoutEngine,
        registry: Arc<GroupRegistry>,
        bus: Arc<NotificationBus>,
    }

    /// Wire a full stack over a connected memory store, retirement rules
    /// installed, the way the runtime does at startup.
    async fn stack() -> Stack {
        let store = Arc::new(MemoryStore::connected());
        let expiry = ExpiryCoordinator::new(86_400);
        expiry.configure(store.as_ref()).await.unwrap();

        let registry = Arc::new(GroupRegistry::new(store.clone()));
        let bus = Arc::new(NotificationBus::new());
        let engine = FanoutEngine::new(store, registry.clone(), bus.clone(), expiry);
        Stack {
            engine,
            registry,
            bus,
        }
    }

    // =============================================================================
    // END-TO-END SCENARIOS
    // =============================================================================

    /// The full group scenario: create a group, send with a tag, and check
    /// both the durable side and the live side for every party involved.
    #[tokio::test]
    async fn test_group_send_end_to_end() {
        let s = stack().await;
        s.registry
            .create_group("team", vec!["a".into(), "b".into()])
            .await
            .unwrap();

        let group_key = RoutingKey::group("team");
        let mut on_urgent = s
            .bus
            .subscribe(&group_key, TagFilter::any_of(vec!["urgent".into()]));
        let mut on_other = s
            .bus
            .subscribe(&group_key, TagFilter::any_of(vec!["other".into()]));
        let mut member_a = s.bus.subscribe(&RoutingKey::user("a"), TagFilter::all());

        s.engine
            .send_to_group("team", "sys", "hi", vec!["urgent".into()], None)
            .await
            .unwrap();

        // Durable: each member owns one queryable copy.
        let copies = s.engine.list_user_notifications("a", false).await.unwrap();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].payload, "hi");

        // Live: member push arrives regardless of tags.
        let personal = timeout(Duration::from_millis(100), member_a.recv())
            .await
            .expect("timeout")
            .expect("push");
        assert_eq!(personal.recipient_user.as_deref(), Some("a"));

        // Live: the group-level record reaches the matching filter only.
        let broadcast = timeout(Duration::from_millis(100), on_urgent.recv())
            .await
            .expect("timeout")
            .expect("push");
        assert!(broadcast.recipient_user.is_none());
        assert_eq!(broadcast.tags, vec!["urgent".to_string()]);
        assert!(on_other.try_recv().is_none());
    }

    /// Per-recipient copies and the summary correlate through identical
    /// timestamps, while every id stays unique.
    #[tokio::test]
    async fn test_group_send_correlates_through_shared_timestamps() {
        let s = stack().await;
        s.registry
            .create_group("team", vec!["a".into(), "b".into(), "c".into()])
            .await
            .unwrap();

        s.engine
            .send_to_group("team", "sys", "hi", Vec::new(), None)
            .await
            .unwrap();

        let summary = &s.engine.list_group_notifications("team", &[]).await.unwrap()[0];
        let mut ids = vec![summary.id];
        for member in ["a", "b", "c"] {
            let copy = &s.engine.list_user_notifications(member, false).await.unwrap()[0];
            assert_eq!(copy.created_at, summary.created_at);
            assert_eq!(copy.expire_at, summary.expire_at);
            ids.push(copy.id);
        }

        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    /// A direct send is immediately queryable and snoozeable.
    #[tokio::test]
    async fn test_user_send_then_snooze_flow() {
        let s = stack().await;
        let id = s
            .engine
            .send_to_user("alice", "bob", "ping", None)
            .await
            .unwrap();

        assert_eq!(
            s.engine.list_user_notifications("alice", false).await.unwrap()[0].id,
            id
        );

        s.engine.sleep_toggle(id).await.unwrap();
        assert!(s
            .engine
            .list_user_notifications("alice", false)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            s.engine.list_user_notifications("alice", true).await.unwrap()[0].id,
            id
        );
    }

    /// Membership changes take effect on the next send.
    #[tokio::test]
    async fn test_membership_changes_affect_next_send() {
        let s = stack().await;
        s.registry
            .create_group("team", vec!["a".into()])
            .await
            .unwrap();

        s.engine
            .send_to_group("team", "sys", "first", Vec::new(), None)
            .await
            .unwrap();
        s.registry.add_member("team", "b").await.unwrap();
        s.registry.remove_member("team", "a").await.unwrap();
        s.engine
            .send_to_group("team", "sys", "second", Vec::new(), None)
            .await
            .unwrap();

        let for_a = s.engine.list_user_notifications("a", false).await.unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].payload, "first");

        let for_b = s.engine.list_user_notifications("b", false).await.unwrap();
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].payload, "second");
    }

    /// A sender-provided TTL below the rolling window shortens retention:
    /// the record disappears from queries once its own expiry passes.
    #[tokio::test]
    async fn test_short_ttl_retires_record_from_queries() {
        let store = Arc::new(MemoryStore::connected());
        let expiry = ExpiryCoordinator::new(86_400);
        expiry.configure(store.as_ref()).await.unwrap();

        let registry = Arc::new(GroupRegistry::new(store.clone()));
        let bus = Arc::new(NotificationBus::new());
        let engine = FanoutEngine::new(store, registry, bus, expiry);

        let ttl = TtlSpec {
            mins: Some(0),
            ..TtlSpec::default()
        };
        engine
            .send_to_user("alice", "bob", "ephemeral", Some(ttl))
            .await
            .unwrap();

        // expire_at == created_at, so the exact rule has already fired.
        assert!(engine
            .list_user_notifications("alice", false)
            .await
            .unwrap()
            .is_empty());
    }

    /// The runtime wires the same stack: operations work through its
    /// container and stop once the store disconnects on shutdown.
    #[tokio::test]
    async fn test_runtime_lifecycle_end_to_end() {
        let runtime = CourierRuntime::start(CourierConfig::default()).await.unwrap();
        let engine = runtime.container().engine().clone();

        engine
            .send_to_user("alice", "bob", "hi", None)
            .await
            .unwrap();
        assert!(runtime.health().await.is_ok());

        runtime.shutdown().await.unwrap();
        assert!(engine.send_to_user("alice", "bob", "bye", None).await.is_err());
    }
}
