//! Roomcast Core
//!
//! This crate contains the room/session coordination engine shared by the
//! relay server's transport and HTTP surfaces: the in-memory room registry,
//! the message model, and the wire date format.

pub mod dates;
pub mod error;
pub mod registry;
pub mod types;

pub use error::*;
pub use registry::*;
pub use types::*;
