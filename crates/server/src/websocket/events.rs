//! WebSocket event types and serialization
//!
//! Defines all client-to-server and server-to-client event types
//! with type-safe serde serialization. Event names and payload field
//! casing (`userToSignal`, `callerID`) are part of the wire contract.

use serde::{Deserialize, Serialize};

use roomcast_core::{ConnId, Message};

// =============================================================================
// Client-to-Server Events
// =============================================================================

/// Events sent from client to server
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Join a room under a nickname
    #[serde(rename = "room:join")]
    Join { room: String, nickname: String },

    /// Post a chat message to a room
    #[serde(rename = "room:new_message")]
    NewMessage {
        room: String,
        nickname: String,
        text: String,
        date: String,
    },

    /// Offer a signaling payload to another connection
    #[serde(rename = "peer:sending_signal")]
    SendingSignal {
        #[serde(rename = "userToSignal")]
        user_to_signal: ConnId,
        signal: serde_json::Value,
        #[serde(rename = "callerID")]
        caller_id: ConnId,
    },

    /// Answer a previously received signaling offer
    #[serde(rename = "peer:returning_signal")]
    ReturningSignal {
        #[serde(rename = "callerID")]
        caller_id: ConnId,
        signal: serde_json::Value,
    },
}

// =============================================================================
// Server-to-Client Events
// =============================================================================

/// Events sent from server to client
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Connection acknowledged; carries the id peers use to address this client
    Connected { id: ConnId },

    /// Updated nickname roster for a room, in join order
    #[serde(rename = "room:set_users")]
    SetUsers { users: Vec<String> },

    /// Connection ids newcomers' peers should initiate signaling with
    #[serde(rename = "room:create_peers")]
    CreatePeers { peers: Vec<ConnId> },

    /// Chat message relayed to the rest of the room
    #[serde(rename = "room:new_message")]
    NewMessage {
        #[serde(flatten)]
        message: Message,
    },

    /// Signaling offer relayed to the addressed connection
    #[serde(rename = "room:user_joined")]
    UserJoined {
        signal: serde_json::Value,
        #[serde(rename = "callerID")]
        caller_id: ConnId,
    },

    /// Signaling answer relayed back to the original caller
    #[serde(rename = "room:receiving_returned_signal")]
    ReceivingReturnedSignal {
        signal: serde_json::Value,
        id: ConnId,
    },

    /// Error message
    Error { message: String },
}
