//! Generic in-process publish/subscribe, keyed by an arbitrary room id.
//!
//! Built directly on [`tokio::sync::broadcast`]: each room is one broadcast
//! channel, subscribers get their own receiver, and a slow subscriber never
//! blocks a fast one. The room is created lazily on first subscribe and
//! dropped once its sender and every receiver are gone.

mod policy;

use parking_lot::RwLock;
use tokio::sync::broadcast;

pub use policy::{BackpressurePolicy, RecvOutcome};

/// Default per-room channel capacity when none is given to [`EventBus::new`].
pub const DEFAULT_CAPACITY: usize = 256;

/// A room-scoped broadcast bus for events of type `T`.
///
/// `T` must be `Clone` because every subscriber receives its own copy.
pub struct EventBus<T> {
    capacity: usize,
    policy: BackpressurePolicy,
    rooms: RwLock<std::collections::HashMap<String, broadcast::Sender<T>>>,
}

impl<T: Clone + Send + 'static> EventBus<T> {
    /// Creates a bus with the default capacity and [`BackpressurePolicy::DropOldest`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus whose rooms buffer up to `capacity` unread events per
    /// subscriber before the oldest are evicted.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            policy: BackpressurePolicy::DropOldest,
            rooms: RwLock::new(std::collections::HashMap::new()),
        }
    }

    /// Overrides the backpressure policy new subscribers observe.
    pub fn with_policy(mut self, policy: BackpressurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Subscribes to `room`, creating it if this is the first subscriber.
    pub fn subscribe(&self, room: &str) -> Subscription<T> {
        let sender = {
            let rooms = self.rooms.read();
            rooms.get(room).cloned()
        };
        let sender = sender.unwrap_or_else(|| {
            let mut rooms = self.rooms.write();
            rooms
                .entry(room.to_string())
                .or_insert_with(|| broadcast::channel(self.capacity).0)
                .clone()
        });
        Subscription {
            receiver: sender.subscribe(),
            policy: self.policy,
        }
    }

    /// Publishes `event` to every current subscriber of `room`.
    ///
    /// Returns the number of subscribers the event was delivered to. A room
    /// with no subscribers yet publishes into a freshly created, empty
    /// channel -- the event is simply not observed by anyone.
    pub fn publish(&self, room: &str, event: T) -> usize {
        let sender = {
            let rooms = self.rooms.read();
            rooms.get(room).cloned()
        };
        let sender = sender.unwrap_or_else(|| {
            let mut rooms = self.rooms.write();
            rooms
                .entry(room.to_string())
                .or_insert_with(|| broadcast::channel(self.capacity).0)
                .clone()
        });
        sender.send(event).unwrap_or(0)
    }

    /// Number of rooms currently tracked (live or with lingering receivers).
    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }

    /// Drops a room's sender, disconnecting every current subscriber once
    /// they've drained their buffered events.
    pub fn close(&self, room: &str) {
        self.rooms.write().remove(room);
    }
}

impl<T: Clone + Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to one room.
pub struct Subscription<T> {
    receiver: broadcast::Receiver<T>,
    policy: BackpressurePolicy,
}

impl<T: Clone + Send + 'static> Subscription<T> {
    /// Awaits the next event, applying the bus's configured backpressure
    /// policy if this subscriber has lagged behind the channel's buffer.
    pub async fn recv(&mut self) -> RecvOutcome<T> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return RecvOutcome::Event(event),
                Err(broadcast::error::RecvError::Closed) => return RecvOutcome::Closed,
                Err(broadcast::error::RecvError::Lagged(skipped)) => match self.policy {
                    BackpressurePolicy::DropOldest => continue,
                    BackpressurePolicy::ReportLag => return RecvOutcome::Lagged(skipped),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_is_observed_by_existing_subscriber() {
        let bus: EventBus<&'static str> = EventBus::new();
        let mut sub = bus.subscribe("exec-1");
        bus.publish("exec-1", "started");
        assert!(matches!(sub.recv().await, RecvOutcome::Event("started")));
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let bus: EventBus<&'static str> = EventBus::new();
        let mut a = bus.subscribe("a");
        bus.publish("b", "for-b");
        let delivered = tokio::time::timeout(std::time::Duration::from_millis(20), a.recv()).await;
        assert!(delivered.is_err(), "subscriber of room a should not see room b's event");
    }

    #[tokio::test]
    async fn multiple_subscribers_each_get_a_copy() {
        let bus: EventBus<u32> = EventBus::new();
        let mut s1 = bus.subscribe("room");
        let mut s2 = bus.subscribe("room");
        let delivered = bus.publish("room", 42);
        assert_eq!(delivered, 2);
        assert!(matches!(s1.recv().await, RecvOutcome::Event(42)));
        assert!(matches!(s2.recv().await, RecvOutcome::Event(42)));
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_returns_zero() {
        let bus: EventBus<u32> = EventBus::new();
        assert_eq!(bus.publish("empty", 1), 0);
    }

    #[tokio::test]
    async fn drop_oldest_policy_skips_lag_transparently() {
        let bus: EventBus<u32> = EventBus::with_capacity(2).with_policy(BackpressurePolicy::DropOldest);
        let mut sub = bus.subscribe("room");
        for i in 0..10 {
            bus.publish("room", i);
        }
        // Whatever arrives first, it must not be an error outcome.
        assert!(matches!(sub.recv().await, RecvOutcome::Event(_)));
    }

    #[tokio::test]
    async fn report_lag_policy_surfaces_skipped_count() {
        let bus: EventBus<u32> = EventBus::with_capacity(2).with_policy(BackpressurePolicy::ReportLag);
        let mut sub = bus.subscribe("room");
        for i in 0..10 {
            bus.publish("room", i);
        }
        match sub.recv().await {
            RecvOutcome::Lagged(skipped) => assert!(skipped > 0),
            RecvOutcome::Event(_) => {}
            RecvOutcome::Closed => panic!("unexpected close"),
        }
    }

    #[test]
    fn room_count_reflects_subscriptions() {
        let bus: EventBus<u32> = EventBus::new();
        let _s1 = bus.subscribe("a");
        let _s2 = bus.subscribe("b");
        assert_eq!(bus.room_count(), 2);
    }

    #[test]
    fn close_removes_room_tracking() {
        let bus: EventBus<u32> = EventBus::new();
        let _s = bus.subscribe("a");
        bus.close("a");
        assert_eq!(bus.room_count(), 0);
    }
}
