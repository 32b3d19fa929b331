//! Error types for the IRC protocol library.
//!
//! Decoding is permissive and never fails; these errors only arise when an
//! outgoing message cannot be turned into a legal wire line.

use thiserror::Error;

use crate::command::CommandKind;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing framed lines.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line exceeded the maximum allowed length.
    #[error("line too long (limit: {limit} bytes)")]
    LineTooLong {
        /// Maximum allowed length.
        limit: usize,
    },

    /// The requested character encoding label is not recognised.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Illegal control character in an outgoing line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// An outgoing message failed required-field or capability validation.
    ///
    /// Raised before any bytes are produced; a message is never sent partially.
    #[error("invalid {command} message")]
    InvalidMessage {
        /// Wire token of the offending message (e.g. `WHISPER`, `818`).
        command: String,
        /// Why the message was rejected.
        #[source]
        cause: MessageError,
    },
}

impl ProtocolError {
    /// The underlying [`MessageError`], if this is an `InvalidMessage`.
    pub fn message_error(&self) -> Option<&MessageError> {
        match self {
            ProtocolError::InvalidMessage { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Reasons an outgoing message is rejected by its schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageError {
    /// A field the schema requires is empty.
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),

    /// The message needs a server feature that was not advertised.
    #[error("server does not advertise {0}")]
    UnsupportedFeature(&'static str),

    /// A parameter cannot be represented on the wire.
    #[error("illegal parameter {0:?}")]
    IllegalParameter(String),

    /// More parameters than a single line may carry.
    #[error("too many parameters: {0} (limit: 15)")]
    TooManyParameters(usize),

    /// No schema is registered for this message variant.
    #[error("no schema registered for {0:?}")]
    Unregistered(CommandKind),
}

/// Inconsistencies detected while building or checking a schema catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    /// Two schemas produce the same message variant.
    #[error("duplicate schema for {0:?}")]
    DuplicateKind(CommandKind),

    /// A line is accepted by more than one schema sharing a command token.
    #[error("line {line:?} accepted by both {first:?} and {second:?}")]
    Ambiguous {
        /// The offending line.
        line: String,
        /// Schema that wins by precedence.
        first: CommandKind,
        /// Schema shadowed by `first`.
        second: CommandKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::LineTooLong { limit: 8191 };
        assert_eq!(format!("{}", err), "line too long (limit: 8191 bytes)");

        let err = MessageError::MissingField("channel");
        assert_eq!(format!("{}", err), "required field `channel` is empty");
    }

    #[test]
    fn test_invalid_message_chains_cause() {
        let cause = MessageError::UnsupportedFeature("ELIST=U");
        let err = ProtocolError::InvalidMessage {
            command: "LIST".to_string(),
            cause: cause.clone(),
        };

        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), cause.to_string());
        assert_eq!(err.message_error(), Some(&cause));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: ProtocolError = io_err.into();
        assert!(matches!(err, ProtocolError::Io(_)));
        assert!(err.message_error().is_none());
    }
}
