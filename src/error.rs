//! Unified error handling for slirc-presence.

use slirc_proto::ProtocolError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the presence client.
///
/// Presence bookkeeping itself never fails: unknown nicknames and missing
/// contacts are absorbed. Only sends and the connection can go wrong.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A send was attempted while disconnected. Not retried.
    #[error("transport unavailable")]
    TransportUnavailable,

    /// An outgoing message could not be encoded, or the line codec failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The client task has stopped and no longer accepts commands.
    #[error("client task closed")]
    Closed,
}

impl ClientError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TransportUnavailable => "transport_unavailable",
            Self::Protocol(ProtocolError::InvalidMessage { .. }) => "invalid_message",
            Self::Protocol(_) => "protocol_error",
            Self::Io(_) => "io_error",
            Self::Config(_) => "config_error",
            Self::Closed => "closed",
        }
    }
}
