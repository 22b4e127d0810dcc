//! Global WebSocket state management
//!
//! Maintains global state for all WebSocket connections and room groups.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use roomcast_core::ConnId;
use serde::Serialize;

use super::connection::Connection;
use super::events::ServerEvent;
use super::groups::RoomGroups;

/// Global WebSocket state shared across all connections
#[derive(Clone)]
pub struct WebSocketState {
    /// All active connections indexed by connection id
    pub connections: Arc<RwLock<HashMap<ConnId, Arc<Connection>>>>,

    /// Room groups for broadcast addressing
    pub groups: Arc<RoomGroups>,
}

impl WebSocketState {
    /// Create new WebSocket state
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            groups: Arc::new(RoomGroups::new()),
        }
    }

    /// Add a connection
    pub async fn add_connection(&self, conn: Connection) -> Arc<Connection> {
        let conn = Arc::new(conn);
        let mut connections = self.connections.write().await;
        connections.insert(conn.id, Arc::clone(&conn));

        tracing::info!(
            conn_id = %conn.id,
            total_connections = connections.len(),
            "WebSocket connection added"
        );

        conn
    }

    /// Remove a connection, dropping it from every room group as well
    pub async fn remove_connection(&self, conn_id: ConnId) {
        let mut connections = self.connections.write().await;
        if connections.remove(&conn_id).is_some() {
            self.groups.remove_connection(conn_id).await;

            tracing::info!(
                conn_id = %conn_id,
                remaining_connections = connections.len(),
                "WebSocket connection removed"
            );
        }
    }

    /// Get a connection by id
    pub async fn get_connection(&self, conn_id: ConnId) -> Option<Arc<Connection>> {
        let connections = self.connections.read().await;
        connections.get(&conn_id).cloned()
    }

    /// Send an event directly to one connection, best-effort
    ///
    /// An absent target is a quiet no-op; signaling relay addresses
    /// connections the client believes exist, and it may be wrong.
    pub async fn send_to(&self, target: ConnId, event: ServerEvent) {
        match self.get_connection(target).await {
            Some(conn) => {
                if conn.send(event).is_err() {
                    tracing::warn!(
                        conn_id = %target,
                        "Failed to send event to connection (likely closed)"
                    );
                }
            }
            None => {
                tracing::debug!(conn_id = %target, "No connection for direct send");
            }
        }
    }

    /// Get total number of active connections
    pub async fn connection_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }

    /// Get statistics about the WebSocket state
    pub async fn get_stats(&self) -> WebSocketStats {
        WebSocketStats {
            active_connections: self.connection_count().await,
            active_groups: self.groups.group_count().await,
        }
    }
}

impl Default for WebSocketState {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about WebSocket connections
#[derive(Debug, Clone, Serialize)]
pub struct WebSocketStats {
    /// Number of active connections
    pub active_connections: usize,
    /// Number of non-empty room groups
    pub active_groups: usize,
}
