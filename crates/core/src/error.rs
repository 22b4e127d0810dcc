//! Error types for Roomcast

use thiserror::Error;

/// Errors produced by the room registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// An operation referenced a room absent from the registry. Recoverable:
    /// the session router drops the offending event instead of failing the
    /// connection.
    #[error("Unknown room: {0}")]
    UnknownRoom(String),
}
