//! WebSocket connection handle
//!
//! Represents an active WebSocket connection addressable by its id.

use tokio::sync::mpsc;

use roomcast_core::ConnId;

use super::events::ServerEvent;

/// An active WebSocket connection
#[derive(Debug)]
pub struct Connection {
    /// Unique id for this connection, the addressing key for direct sends
    pub id: ConnId,

    /// Channel to send events to this connection
    pub sender: mpsc::UnboundedSender<ServerEvent>,
}

impl Connection {
    /// Create a new connection with a fresh id
    pub fn new(sender: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            id: ConnId::new(),
            sender,
        }
    }

    /// Send an event to this connection
    ///
    /// Returns Ok(()) if sent successfully, Err if connection is closed
    #[allow(clippy::result_large_err)] // Error type is from tokio mpsc, containing the failed event
    pub fn send(&self, event: ServerEvent) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event)
    }
}
