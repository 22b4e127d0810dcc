//! Room group management for pub/sub
//!
//! Tracks which connections listen to which room and fans events out to
//! them. This is the transport-level view of a room; membership nicknames
//! and history live in the registry.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use roomcast_core::ConnId;

use super::connection::Connection;
use super::events::ServerEvent;

/// Manages room groups for broadcasting events
pub struct RoomGroups {
    /// Map of room id -> list of listening connections
    groups: RwLock<HashMap<String, Vec<Arc<Connection>>>>,
}

impl RoomGroups {
    /// Create a new group table
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Add a connection to a room group. Joining a group twice is a no-op.
    pub async fn join(&self, room: &str, conn: Arc<Connection>) {
        let mut groups = self.groups.write().await;
        let conns = groups.entry(room.to_string()).or_default();
        if conns.iter().any(|c| c.id == conn.id) {
            return;
        }
        conns.push(Arc::clone(&conn));

        tracing::debug!(
            room = %room,
            conn_id = %conn.id,
            group_size = conns.len(),
            "Connection joined room group"
        );
    }

    /// Broadcast an event to every connection in a room group
    ///
    /// Silently ignores send errors (closed connections will be cleaned up)
    pub async fn broadcast(&self, room: &str, event: ServerEvent) {
        self.fan_out(room, None, event).await;
    }

    /// Broadcast an event to a room group, skipping one connection
    ///
    /// Used for sender-originated events the sender must not echo back.
    pub async fn broadcast_except(&self, room: &str, skip: ConnId, event: ServerEvent) {
        self.fan_out(room, Some(skip), event).await;
    }

    async fn fan_out(&self, room: &str, skip: Option<ConnId>, event: ServerEvent) {
        let groups = self.groups.read().await;
        let Some(conns) = groups.get(room) else {
            tracing::debug!(room = %room, event = ?event, "No group for room - no listeners");
            return;
        };

        let mut success_count = 0;
        let mut failed_count = 0;

        for conn in conns {
            if skip == Some(conn.id) {
                continue;
            }
            match conn.send(event.clone()) {
                Ok(()) => success_count += 1,
                Err(_) => {
                    failed_count += 1;
                    tracing::warn!(
                        conn_id = %conn.id,
                        "Failed to send event to connection (likely closed)"
                    );
                }
            }
        }

        tracing::debug!(
            room = %room,
            event = ?event,
            recipients = success_count,
            failed = failed_count,
            "Broadcast event to room group"
        );
    }

    /// Remove a connection from every group it listens to
    pub async fn remove_connection(&self, conn_id: ConnId) {
        let mut groups = self.groups.write().await;
        let mut removed_from = 0;

        for conns in groups.values_mut() {
            let before_len = conns.len();
            conns.retain(|c| c.id != conn_id);
            if conns.len() < before_len {
                removed_from += 1;
            }
        }

        // Clean up empty groups
        groups.retain(|_, conns| !conns.is_empty());

        if removed_from > 0 {
            tracing::debug!(
                conn_id = %conn_id,
                groups = removed_from,
                "Removed connection from room groups"
            );
        }
    }

    /// Number of connections listening to a room
    pub async fn group_size(&self, room: &str) -> usize {
        let groups = self.groups.read().await;
        groups.get(room).map(|v| v.len()).unwrap_or(0)
    }

    /// Total number of non-empty groups
    pub async fn group_count(&self) -> usize {
        let groups = self.groups.read().await;
        groups.len()
    }
}

impl Default for RoomGroups {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn new_conn() -> (Arc<Connection>, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Connection::new(tx)), rx)
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_listener() {
        let groups = RoomGroups::new();
        let (conn1, mut rx1) = new_conn();
        let (conn2, mut rx2) = new_conn();

        groups.join("r1", conn1).await;
        groups.join("r1", conn2).await;

        let event = ServerEvent::SetUsers {
            users: vec!["Alice".to_string()],
        };
        groups.broadcast("r1", event.clone()).await;

        assert_eq!(rx1.try_recv(), Ok(event.clone()));
        assert_eq!(rx2.try_recv(), Ok(event));
    }

    #[tokio::test]
    async fn test_broadcast_except_skips_sender() {
        let groups = RoomGroups::new();
        let (conn1, mut rx1) = new_conn();
        let (conn2, mut rx2) = new_conn();

        groups.join("r1", Arc::clone(&conn1)).await;
        groups.join("r1", conn2).await;

        let event = ServerEvent::SetUsers {
            users: vec!["Alice".to_string(), "Bob".to_string()],
        };
        groups.broadcast_except("r1", conn1.id, event.clone()).await;

        assert!(rx1.try_recv().is_err());
        assert_eq!(rx2.try_recv(), Ok(event));
    }

    #[tokio::test]
    async fn test_broadcast_to_missing_group_is_a_no_op() {
        let groups = RoomGroups::new();
        groups
            .broadcast("ghost", ServerEvent::SetUsers { users: vec![] })
            .await;
        assert_eq!(groups.group_count().await, 0);
    }

    #[tokio::test]
    async fn test_rejoining_a_group_does_not_duplicate_delivery() {
        let groups = RoomGroups::new();
        let (conn, mut rx) = new_conn();

        groups.join("r1", Arc::clone(&conn)).await;
        groups.join("r1", conn).await;
        assert_eq!(groups.group_size("r1").await, 1);

        groups
            .broadcast("r1", ServerEvent::SetUsers { users: vec![] })
            .await;
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_remove_connection_cleans_empty_groups() {
        let groups = RoomGroups::new();
        let (conn1, _rx1) = new_conn();
        let (conn2, _rx2) = new_conn();

        groups.join("r1", Arc::clone(&conn1)).await;
        groups.join("r2", Arc::clone(&conn1)).await;
        groups.join("r2", conn2).await;
        assert_eq!(groups.group_count().await, 2);

        groups.remove_connection(conn1.id).await;

        assert_eq!(groups.group_count().await, 1);
        assert_eq!(groups.group_size("r1").await, 0);
        assert_eq!(groups.group_size("r2").await, 1);
    }
}
