//! # Subscription Behavior Under Churn and Load
//!
//! Broker guarantees exercised across tasks: multicast isolation, slow
//! subscribers, and cleanup under connect/disconnect churn.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use courier_bus::{NotificationBus, RoutingKey, TagFilter};
    use courier_types::Notification;

    fn note(payload: &str) -> Notification {
        let now = chrono::Utc::now();
        Notification::recipient_copy("alice", "bob", payload, now, now)
    }

    /// Two sessions on the same topic each see the full sequence.
    #[tokio::test]
    async fn test_concurrent_sessions_each_receive_every_message() {
        let bus = Arc::new(NotificationBus::new());
        let key = RoutingKey::user("alice");

        let mut tasks = Vec::new();
        for _ in 0..2 {
            let mut stream = bus.subscribe(&key, TagFilter::all()).into_stream();
            tasks.push(tokio::spawn(async move {
                let mut payloads = Vec::new();
                for _ in 0..3 {
                    let n = timeout(Duration::from_secs(1), stream.next())
                        .await
                        .expect("timeout")
                        .expect("item");
                    payloads.push(n.payload);
                }
                payloads
            }));
        }

        // Let both sessions register before publishing.
        tokio::task::yield_now().await;
        for i in 0..3 {
            bus.publish(&key, &note(&format!("m{i}")));
        }

        for task in tasks {
            let payloads = task.await.unwrap();
            assert_eq!(payloads, vec!["m0", "m1", "m2"]);
        }
    }

    /// A stalled session loses its own overflow but never affects the
    /// publisher or its peers.
    #[tokio::test]
    async fn test_stalled_session_does_not_affect_others() {
        let bus = Arc::new(NotificationBus::with_capacity(2));
        let key = RoutingKey::user("alice");

        let stalled = bus.subscribe(&key, TagFilter::all());
        let mut healthy = bus.subscribe(&key, TagFilter::all());

        // Publishing never blocks even though `stalled` drains nothing.
        for i in 0..10 {
            bus.publish(&key, &note(&format!("m{i}")));
            let received = timeout(Duration::from_millis(100), healthy.recv())
                .await
                .expect("timeout")
                .expect("push");
            assert_eq!(received.payload, format!("m{i}"));
        }

        drop(stalled);
        assert_eq!(bus.subscriber_count(&key), 1);
    }

    /// Sessions that end by drop, explicit unsubscribe or task abort all
    /// leave the subscriber list clean.
    #[tokio::test]
    async fn test_churn_leaves_no_dead_entries() {
        let bus = Arc::new(NotificationBus::new());
        let key = RoutingKey::user("alice");

        for round in 0..50 {
            let sub = bus.subscribe(&key, TagFilter::all());
            match round % 3 {
                0 => drop(sub),
                1 => sub.unsubscribe(),
                _ => {
                    let handle = tokio::spawn(async move {
                        let mut sub = sub;
                        sub.recv().await
                    });
                    handle.abort();
                    let _ = handle.await;
                }
            }
        }

        assert_eq!(bus.subscriber_count(&key), 0);
        assert_eq!(bus.topic_count(), 0);
    }

    /// Concurrent publishers to one topic: no message is lost and each
    /// publisher's own order is preserved.
    #[tokio::test]
    async fn test_concurrent_publishers_interleave_without_loss() {
        let bus = Arc::new(NotificationBus::new());
        let key = RoutingKey::user("alice");
        let mut sub = bus.subscribe(&key, TagFilter::all());

        let mut publishers = Vec::new();
        for p in 0..4 {
            let bus = bus.clone();
            let key = key.clone();
            publishers.push(tokio::spawn(async move {
                for i in 0..25 {
                    bus.publish(&key, &note(&format!("p{p}-{i}")));
                }
            }));
        }
        for publisher in publishers {
            publisher.await.unwrap();
        }

        let mut per_publisher: Vec<Vec<usize>> = vec![Vec::new(); 4];
        for _ in 0..100 {
            let n = timeout(Duration::from_secs(1), sub.recv())
                .await
                .expect("timeout")
                .expect("push");
            let (p, i) = n.payload[1..].split_once('-').unwrap();
            per_publisher[p.parse::<usize>().unwrap()].push(i.parse().unwrap());
        }

        for sequence in per_publisher {
            assert_eq!(sequence, (0..25).collect::<Vec<_>>());
        }
    }

    /// Group filters stay independent per session even under concurrent
    /// subscribes on the same topic.
    #[tokio::test]
    async fn test_mixed_filters_on_one_topic() {
        let bus = Arc::new(NotificationBus::new());
        let key = RoutingKey::group("team");

        let mut urgent_only = bus.subscribe(&key, TagFilter::any_of(vec!["urgent".into()]));
        let mut everything = bus.subscribe(&key, TagFilter::all());

        let now = chrono::Utc::now();
        let tagged =
            Notification::group_summary("team", "sys", "tagged", vec!["info".into()], now, now);
        let untagged = Notification::group_summary("team", "sys", "untagged", Vec::new(), now, now);

        bus.publish(&key, &tagged);
        bus.publish(&key, &untagged);

        // The filtered session skips the mismatched tag but still gets
        // the untagged broadcast.
        let got = timeout(Duration::from_millis(100), urgent_only.recv())
            .await
            .expect("timeout")
            .expect("push");
        assert_eq!(got.payload, "untagged");

        assert_eq!(everything.recv().await.unwrap().payload, "tagged");
        assert_eq!(everything.recv().await.unwrap().payload, "untagged");
    }
}
