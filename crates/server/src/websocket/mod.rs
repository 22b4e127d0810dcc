//! WebSocket support for the chat relay
//!
//! Carries the real-time side of the server: room rosters, message relay,
//! and peer-signaling handoff between connections.
//!
//! # Architecture
//!
//! - **Connection**: An active WebSocket connection addressable by id
//! - **Groups**: Room-keyed pub/sub for broadcasting events
//! - **State**: Global WebSocket state shared across all connections
//! - **Handler**: Axum WebSocket route handler and event routing
//! - **Events**: Type-safe event definitions for client/server communication

pub mod connection;
pub mod events;
pub mod groups;
pub mod handler;
pub mod state;

pub use handler::ws_handler;
pub use state::WebSocketState;
