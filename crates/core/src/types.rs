//! Common types used across Roomcast

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// ID Wrappers
// =============================================================================

/// Connection ID wrapper
///
/// Stable opaque identifier the transport assigns to a live connection.
/// Doubles as the addressing key for direct sends and for room membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnId(pub Uuid);

impl ConnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ConnId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Messages
// =============================================================================

/// A chat message as stored in a room's log and relayed to members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sender's display name at the time of sending. A snapshot, not a live
    /// reference to the member entry.
    pub nickname: String,
    /// Message body.
    pub text: String,
    /// `DD.MM.YYYY` date string. Client-supplied for user messages,
    /// produced by [`crate::dates::format_date`] for system messages.
    pub date: String,
}

impl Message {
    pub fn new(
        nickname: impl Into<String>,
        text: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            text: text.into(),
            date: date.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_conn_id_new() {
        let id1 = ConnId::new();
        let id2 = ConnId::new();
        assert_ne!(id1, id2); // Each new ID should be unique
    }

    #[test]
    fn test_conn_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let conn_id: ConnId = uuid.into();
        assert_eq!(conn_id.0, uuid);
    }

    #[test]
    fn test_conn_id_serializes_transparent() {
        let id = ConnId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }

    #[test]
    fn test_message_wire_shape() {
        let message = Message::new("Alice", "hi", "01.01.2024");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "nickname": "Alice",
                "text": "hi",
                "date": "01.01.2024",
            })
        );
    }
}
