//! Application configuration

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Signaling: how long after a join the peer-creation trigger fires
    pub create_peers_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults; set-but-unparseable values
    /// are a hard error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            port: match env::var("DEFAULT_PORT") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|_| ConfigError::Invalid("DEFAULT_PORT"))?,
                Err(_) => 8080,
            },

            // Signaling
            create_peers_delay_ms: match env::var("CREATE_PEERS_DELAY_MS") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|_| ConfigError::Invalid("CREATE_PEERS_DELAY_MS"))?,
                Err(_) => 1000,
            },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
