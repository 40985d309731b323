// Live display fan-out
//
// The broker owns the only shared mutable structure in the live path: the
// event-room membership map. Writers and displays never touch it directly,
// they go through join/leave/broadcast.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use uuid::Uuid;

use tamu_core::AttendanceNotice;

pub mod handlers;
pub mod messages;

pub use handlers::{routes, AppState};
pub use messages::{WsInbound, WsOutbound};

/// Unique identity of one display connection.
///
/// Assigned when the socket registers; used for precise room cleanup when
/// the connection closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default)]
struct Rooms {
    /// connection_id -> outbound channel, registered for the socket's lifetime
    connections: HashMap<ConnectionId, UnboundedSender<String>>,
    /// event_id -> members; a connection appears at most once per room
    rooms: HashMap<i64, HashMap<ConnectionId, UnboundedSender<String>>>,
    /// connection_id -> rooms joined, for cleanup on abrupt termination
    memberships: HashMap<ConnectionId, HashSet<i64>>,
}

/// Event room broker: membership bookkeeping plus fan-out.
///
/// All operations take the map lock briefly; broadcast snapshots the member
/// set and delivers after the lock is dropped, so joins and leaves may
/// interleave with delivery without blocking on it.
#[derive(Default, Clone)]
pub struct EventRoomBroker {
    inner: Arc<RwLock<Rooms>>,
}

impl EventRoomBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection, returning its identity and the receiving
    /// end of its outbound channel. Per-subscriber FIFO ordering comes from
    /// this channel.
    pub async fn register(&self) -> (ConnectionId, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        let id = ConnectionId::new();
        let mut guard = self.inner.write().await;
        guard.connections.insert(id, tx);
        tracing::debug!(connection = %id, "display connection registered");
        (id, rx)
    }

    /// Add a connection to an event room. Idempotent: joining a room the
    /// connection is already in has no additional effect.
    pub async fn join(&self, connection: ConnectionId, event_id: i64) {
        let mut guard = self.inner.write().await;
        let Some(tx) = guard.connections.get(&connection).cloned() else {
            tracing::warn!(connection = %connection, "join from unregistered connection");
            return;
        };
        guard.rooms.entry(event_id).or_default().insert(connection, tx);
        guard
            .memberships
            .entry(connection)
            .or_default()
            .insert(event_id);
        tracing::debug!(connection = %connection, event_id, "joined event room");
    }

    /// Remove a connection from an event room. No-op if not a member.
    pub async fn leave(&self, connection: ConnectionId, event_id: i64) {
        let mut guard = self.inner.write().await;
        if let Some(members) = guard.rooms.get_mut(&event_id) {
            members.remove(&connection);
            if members.is_empty() {
                guard.rooms.remove(&event_id);
            }
        }
        if let Some(joined) = guard.memberships.get_mut(&connection) {
            joined.remove(&event_id);
        }
        tracing::debug!(connection = %connection, event_id, "left event room");
    }

    /// Drop a connection from every room it was part of. Called on socket
    /// teardown, clean or abrupt.
    pub async fn on_disconnect(&self, connection: ConnectionId) {
        let mut guard = self.inner.write().await;
        guard.connections.remove(&connection);
        if let Some(joined) = guard.memberships.remove(&connection) {
            for event_id in joined {
                if let Some(members) = guard.rooms.get_mut(&event_id) {
                    members.remove(&connection);
                    if members.is_empty() {
                        guard.rooms.remove(&event_id);
                    }
                }
            }
        }
        tracing::debug!(connection = %connection, "display connection closed");
    }

    /// Deliver a new-attendance notice to every current member of the event's
    /// room, at most once each. Zero members is a silent no-op; a failed send
    /// to one member never affects the others.
    pub async fn broadcast(&self, event_id: i64, notice: &AttendanceNotice) {
        let frame = match serde_json::to_string(&WsOutbound::NewAttendance {
            data: notice.clone(),
        }) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(event_id, error = %e, "failed to serialize attendance notice");
                return;
            }
        };

        // Snapshot under the read lock, deliver after dropping it: members
        // joining or leaving mid-broadcast neither block nor get double sends.
        let members: Vec<(ConnectionId, UnboundedSender<String>)> = {
            let guard = self.inner.read().await;
            match guard.rooms.get(&event_id) {
                Some(members) => members
                    .iter()
                    .map(|(id, tx)| (*id, tx.clone()))
                    .collect(),
                None => return,
            }
        };

        let total = members.len();
        let mut failed = 0usize;
        for (id, tx) in members {
            if tx.send(frame.clone()).is_err() {
                // Receiver already gone; on_disconnect will reap it
                failed += 1;
                tracing::debug!(connection = %id, event_id, "dropped delivery to closed connection");
            }
        }
        tracing::debug!(event_id, delivered = total - failed, failed, "broadcast attendance notice");
    }

    /// Current member count of one room (diagnostics and tests).
    pub async fn room_size(&self, event_id: i64) -> usize {
        let guard = self.inner.read().await;
        guard.rooms.get(&event_id).map(|m| m.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tamu_core::GuestCategory;

    fn notice(id: i64) -> AttendanceNotice {
        AttendanceNotice {
            id,
            guest_name: "Ana Putri".into(),
            institution: "Universitas Dumai".into(),
            position: None,
            category: GuestCategory::Guest,
            arrival_time: Utc::now(),
            event_name: "Open Campus Day 2024".into(),
            event_slug: "open-campus-day-2024".into(),
        }
    }

    fn parse_notice_id(frame: &str) -> i64 {
        let value: serde_json::Value = serde_json::from_str(frame).unwrap();
        assert_eq!(value["type"], "new-attendance");
        value["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn broadcast_reaches_only_room_members() {
        let broker = EventRoomBroker::new();
        let (a, mut rx_a) = broker.register().await;
        let (b, mut rx_b) = broker.register().await;
        let (c, mut rx_c) = broker.register().await;

        broker.join(a, 7).await;
        broker.join(b, 7).await;
        broker.join(c, 8).await;

        broker.broadcast(7, &notice(1)).await;

        assert_eq!(parse_notice_id(&rx_a.recv().await.unwrap()), 1);
        assert_eq!(parse_notice_id(&rx_b.recv().await.unwrap()), 1);
        // The event-8 subscriber saw nothing
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn join_is_idempotent_delivery_is_at_most_once() {
        let broker = EventRoomBroker::new();
        let (a, mut rx) = broker.register().await;

        broker.join(a, 7).await;
        broker.join(a, 7).await;
        assert_eq!(broker.room_size(7).await, 1);

        broker.broadcast(7, &notice(42)).await;
        assert_eq!(parse_notice_id(&rx.recv().await.unwrap()), 42);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn leave_stops_future_deliveries() {
        let broker = EventRoomBroker::new();
        let (a, mut rx) = broker.register().await;

        broker.join(a, 7).await;
        broker.leave(a, 7).await;
        // Leaving a room we're not in is a no-op
        broker.leave(a, 7).await;

        broker.broadcast(7, &notice(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn disconnect_cleans_up_every_room() {
        let broker = EventRoomBroker::new();
        let (a, _rx) = broker.register().await;

        broker.join(a, 7).await;
        broker.join(a, 8).await;
        assert_eq!(broker.room_size(7).await, 1);
        assert_eq!(broker.room_size(8).await, 1);

        broker.on_disconnect(a).await;
        assert_eq!(broker.room_size(7).await, 0);
        assert_eq!(broker.room_size(8).await, 0);
    }

    #[tokio::test]
    async fn empty_room_broadcast_is_a_noop() {
        let broker = EventRoomBroker::new();
        broker.broadcast(999, &notice(1)).await;
    }

    #[tokio::test]
    async fn one_dead_subscriber_does_not_block_the_rest() {
        let broker = EventRoomBroker::new();
        let (a, rx_a) = broker.register().await;
        let (b, mut rx_b) = broker.register().await;

        broker.join(a, 7).await;
        broker.join(b, 7).await;
        drop(rx_a);

        broker.broadcast(7, &notice(5)).await;
        assert_eq!(parse_notice_id(&rx_b.recv().await.unwrap()), 5);
    }

    #[tokio::test]
    async fn per_subscriber_order_matches_broadcast_order() {
        let broker = EventRoomBroker::new();
        let (a, mut rx) = broker.register().await;
        broker.join(a, 7).await;

        broker.broadcast(7, &notice(1)).await;
        broker.broadcast(7, &notice(2)).await;
        broker.broadcast(7, &notice(3)).await;

        assert_eq!(parse_notice_id(&rx.recv().await.unwrap()), 1);
        assert_eq!(parse_notice_id(&rx.recv().await.unwrap()), 2);
        assert_eq!(parse_notice_id(&rx.recv().await.unwrap()), 3);
    }
}
