use std::path::PathBuf;

use thiserror::Error;

use crate::link::LinkState;

/// Startup configuration failures. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "shared secret not configured: set SOCKET_SHARED_SECRET at build time or in the environment"
    )]
    MissingSharedSecret,
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to read control profile '{}': {source}", path.display())]
    ProfileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse control profile: {0}")]
    ProfileParse(#[from] toml::de::Error),
    #[error("invalid control profile: {0}")]
    InvalidProfile(String),
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("link unavailable (state: {state})")]
    LinkUnavailable { state: LinkState },
    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SendError {
    pub fn is_link_unavailable(&self) -> bool {
        matches!(self, SendError::LinkUnavailable { .. })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
}
