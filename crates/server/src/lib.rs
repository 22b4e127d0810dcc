//! Roomcast server library
//!
//! This crate contains the HTTP and WebSocket server components for
//! Roomcast, a room-based chat relay with peer-signaling support.

pub mod config;
pub mod routes;
pub mod state;
pub mod websocket;

pub use config::Config;
pub use state::AppState;
