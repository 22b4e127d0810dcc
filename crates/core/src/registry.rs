//! Room registry: membership and message history
//!
//! The registry is the process's only state store. Rooms are created lazily
//! via [`RoomRegistry::ensure_room`] and live for the process lifetime;
//! membership entries live and die with a connection's presence in the room;
//! messages are append-only and never trimmed (a known resource-growth
//! property of the room lifecycle, not an oversight).

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::RegistryError;
use crate::types::{ConnId, Message};

/// A named room: join-ordered membership plus the full message log.
#[derive(Debug, Default)]
struct Room {
    /// Connection id -> nickname, in join order. Nicknames need not be
    /// unique; a re-join overwrites the nickname without moving the entry.
    members: Vec<(ConnId, String)>,
    messages: Vec<Message>,
}

/// Point-in-time view of a room, also the JSON body of `GET /rooms/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoomSnapshot {
    pub users: Vec<String>,
    pub messages: Vec<Message>,
}

/// Membership view captured atomically with a join, feeding the follow-up
/// `room:set_users` / `room:create_peers` broadcasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Nicknames in join order, including the new member.
    pub users: Vec<String>,
    /// Connection ids in join order, including the new member.
    pub peers: Vec<ConnId>,
}

/// Result of removing a disconnecting member from one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: String,
    /// Nickname the member carried at removal time.
    pub nickname: String,
    /// Nicknames still present after the removal, in join order.
    pub remaining: Vec<String>,
}

/// Process-wide table of rooms.
///
/// Shared by every connection's handler and the HTTP surface. Each operation
/// takes the inner lock exactly once, so a single inbound event is atomic
/// with respect to the registry.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty room if absent. Idempotent; an existing room keeps
    /// its members and messages.
    pub async fn ensure_room(&self, room_id: &str) {
        let mut rooms = self.rooms.write().await;
        if !rooms.contains_key(room_id) {
            rooms.insert(room_id.to_string(), Room::default());
            tracing::debug!(room = %room_id, total_rooms = rooms.len(), "Room created");
        }
    }

    /// Read a room's members and messages. Unknown rooms read as empty
    /// rather than failing; reads are deliberately lenient.
    pub async fn snapshot(&self, room_id: &str) -> RoomSnapshot {
        let rooms = self.rooms.read().await;
        match rooms.get(room_id) {
            Some(room) => RoomSnapshot {
                users: room.members.iter().map(|(_, nick)| nick.clone()).collect(),
                messages: room.messages.clone(),
            },
            None => RoomSnapshot::default(),
        }
    }

    /// Register `conn_id` as a member of an existing room and return the
    /// resulting membership view.
    ///
    /// The room must have been created first; joining an unknown room fails
    /// with [`RegistryError::UnknownRoom`] and the caller is expected to
    /// drop the event.
    pub async fn join(
        &self,
        room_id: &str,
        conn_id: ConnId,
        nickname: &str,
    ) -> Result<JoinOutcome, RegistryError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::UnknownRoom(room_id.to_string()))?;

        match room.members.iter_mut().find(|(id, _)| *id == conn_id) {
            Some((_, nick)) => *nick = nickname.to_string(),
            None => room.members.push((conn_id, nickname.to_string())),
        }

        tracing::debug!(
            room = %room_id,
            conn_id = %conn_id,
            members = room.members.len(),
            "Member joined room"
        );

        Ok(JoinOutcome {
            users: room.members.iter().map(|(_, nick)| nick.clone()).collect(),
            peers: room.members.iter().map(|(id, _)| *id).collect(),
        })
    }

    /// Append a message to an existing room's log. Same precondition and
    /// failure mode as [`RoomRegistry::join`].
    pub async fn post_message(
        &self,
        room_id: &str,
        message: Message,
    ) -> Result<(), RegistryError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::UnknownRoom(room_id.to_string()))?;
        room.messages.push(message);
        Ok(())
    }

    /// Remove a connection from every room it is a member of.
    ///
    /// There is no reverse index from connection to room, so this visits all
    /// rooms. Returns one entry per room the connection was present in:
    /// normally one, but nothing stops a connection from joining several
    /// rooms before disconnecting.
    pub async fn remove_member_everywhere(&self, conn_id: ConnId) -> Vec<Departure> {
        let mut rooms = self.rooms.write().await;
        let mut departures = Vec::new();

        for (room_id, room) in rooms.iter_mut() {
            let Some(pos) = room.members.iter().position(|(id, _)| *id == conn_id) else {
                continue;
            };
            let (_, nickname) = room.members.remove(pos);
            departures.push(Departure {
                room: room_id.clone(),
                nickname,
                remaining: room.members.iter().map(|(_, nick)| nick.clone()).collect(),
            });
        }

        if !departures.is_empty() {
            tracing::debug!(
                conn_id = %conn_id,
                rooms = departures.len(),
                "Member removed from rooms"
            );
        }
        departures
    }

    /// Number of rooms currently registered.
    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_room_is_idempotent() {
        let registry = RoomRegistry::new();
        registry.ensure_room("r1").await;
        let conn = ConnId::new();
        registry.join("r1", conn, "Alice").await.unwrap();
        registry
            .post_message("r1", Message::new("Alice", "hi", "01.01.2024"))
            .await
            .unwrap();

        // A second ensure must not reset the room.
        registry.ensure_room("r1").await;

        let snapshot = registry.snapshot("r1").await;
        assert_eq!(snapshot.users, vec!["Alice"]);
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(registry.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_join_order_is_preserved() {
        let registry = RoomRegistry::new();
        registry.ensure_room("r1").await;

        let c1 = ConnId::new();
        let c2 = ConnId::new();
        registry.join("r1", c1, "Alice").await.unwrap();
        let outcome = registry.join("r1", c2, "Bob").await.unwrap();

        assert_eq!(outcome.users, vec!["Alice", "Bob"]);
        assert_eq!(outcome.peers, vec![c1, c2]);
        assert_eq!(registry.snapshot("r1").await.users, vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_rejoin_overwrites_nickname_in_place() {
        let registry = RoomRegistry::new();
        registry.ensure_room("r1").await;

        let c1 = ConnId::new();
        let c2 = ConnId::new();
        registry.join("r1", c1, "Alice").await.unwrap();
        registry.join("r1", c2, "Bob").await.unwrap();
        let outcome = registry.join("r1", c1, "Alicia").await.unwrap();

        // Overwritten, not appended; position unchanged.
        assert_eq!(outcome.users, vec!["Alicia", "Bob"]);
        assert_eq!(outcome.peers, vec![c1, c2]);
    }

    #[tokio::test]
    async fn test_messages_append_in_order() {
        let registry = RoomRegistry::new();
        registry.ensure_room("r1").await;

        let posted = vec![
            Message::new("Alice", "hi", "01.01.2024"),
            Message::new("Bob", "hello", "01.01.2024"),
            Message::new("Alice", "bye", "02.01.2024"),
        ];
        for message in &posted {
            registry.post_message("r1", message.clone()).await.unwrap();
        }

        assert_eq!(registry.snapshot("r1").await.messages, posted);
    }

    #[tokio::test]
    async fn test_snapshot_of_unknown_room_is_empty() {
        let registry = RoomRegistry::new();
        let snapshot = registry.snapshot("unknown").await;
        assert!(snapshot.users.is_empty());
        assert!(snapshot.messages.is_empty());
    }

    #[tokio::test]
    async fn test_join_unknown_room_fails() {
        let registry = RoomRegistry::new();
        let err = registry.join("ghost", ConnId::new(), "Alice").await;
        assert_eq!(err, Err(RegistryError::UnknownRoom("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_post_message_to_unknown_room_fails() {
        let registry = RoomRegistry::new();
        let err = registry
            .post_message("ghost", Message::new("Alice", "hi", "01.01.2024"))
            .await;
        assert_eq!(err, Err(RegistryError::UnknownRoom("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_disconnect_reports_removed_member_and_remaining() {
        let registry = RoomRegistry::new();
        registry.ensure_room("r1").await;

        let c1 = ConnId::new();
        let c2 = ConnId::new();
        registry.join("r1", c1, "Alice").await.unwrap();
        registry.join("r1", c2, "Bob").await.unwrap();

        let departures = registry.remove_member_everywhere(c1).await;
        assert_eq!(
            departures,
            vec![Departure {
                room: "r1".to_string(),
                nickname: "Alice".to_string(),
                remaining: vec!["Bob".to_string()],
            }]
        );
        assert_eq!(registry.snapshot("r1").await.users, vec!["Bob"]);
    }

    #[tokio::test]
    async fn test_disconnect_only_touches_joined_rooms() {
        let registry = RoomRegistry::new();
        registry.ensure_room("r1").await;
        registry.ensure_room("r2").await;
        registry.ensure_room("r3").await;

        let c1 = ConnId::new();
        let c2 = ConnId::new();
        registry.join("r1", c1, "Alice").await.unwrap();
        registry.join("r2", c1, "Alice").await.unwrap();
        registry.join("r3", c2, "Bob").await.unwrap();

        let mut departures = registry.remove_member_everywhere(c1).await;
        departures.sort_by(|a, b| a.room.cmp(&b.room));

        let rooms: Vec<&str> = departures.iter().map(|d| d.room.as_str()).collect();
        assert_eq!(rooms, vec!["r1", "r2"]);
        assert!(registry.snapshot("r1").await.users.is_empty());
        assert!(registry.snapshot("r2").await.users.is_empty());
        assert_eq!(registry.snapshot("r3").await.users, vec!["Bob"]);
    }

    #[tokio::test]
    async fn test_remove_unknown_connection_is_a_no_op() {
        let registry = RoomRegistry::new();
        registry.ensure_room("r1").await;
        registry.join("r1", ConnId::new(), "Alice").await.unwrap();

        let departures = registry.remove_member_everywhere(ConnId::new()).await;
        assert!(departures.is_empty());
        assert_eq!(registry.snapshot("r1").await.users, vec!["Alice"]);
    }
}
