//! Shared application state

use std::sync::Arc;

use roomcast_core::RoomRegistry;

use crate::config::Config;
use crate::websocket::WebSocketState;

/// Application state shared by every route and connection handler
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration
    pub config: Arc<Config>,

    /// Process-wide room table
    pub registry: Arc<RoomRegistry>,

    /// WebSocket connections and room groups
    pub ws: WebSocketState,
}

impl AppState {
    /// Create fresh state around a configuration
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(RoomRegistry::new()),
            ws: WebSocketState::new(),
        }
    }
}
