//! Message schemas: one declarative descriptor per message shape.
//!
//! A shape type implements [`Shape`]; [`Schema::of`] erases it into a
//! descriptor of plain function pointers so the [`Catalog`] can hold every
//! shape in one ordered table.

mod catalog;

use std::fmt;

pub use catalog::Catalog;

use crate::command::{Command, CommandKind, Variant};
use crate::error::MessageError;
use crate::isupport::ServerCapabilities;
use crate::message::RawLine;

/// Wire layout of one message shape.
pub trait Shape: Variant + Into<Command> {
    /// Command word or three-digit numeric.
    const TOKEN: &'static str;

    /// Disambiguation beyond the command token.
    ///
    /// Shapes sharing a token rely on this and on their catalog order.
    /// `caps` are the server's advertised capabilities (e.g. `CHANTYPES`).
    fn accepts(line: &RawLine, caps: &ServerCapabilities) -> bool {
        let _ = (line, caps);
        true
    }

    /// Map parameters positionally into fields. Never fails; absent or
    /// malformed optional parameters take neutral values.
    fn decode(line: &RawLine) -> Self;

    /// Parameters to send after the command token.
    fn encode(&self) -> Result<Vec<String>, MessageError>;

    /// Reject fields the server has not advertised support for.
    fn validate(&self, caps: &ServerCapabilities) -> Result<(), MessageError> {
        let _ = caps;
        Ok(())
    }
}

type AcceptsFn = fn(&RawLine, &ServerCapabilities) -> bool;
type DecodeFn = fn(&RawLine) -> Command;
type EncodeFn = fn(&Command) -> Option<Result<Vec<String>, MessageError>>;
type ValidateFn = fn(&Command, &ServerCapabilities) -> Option<Result<(), MessageError>>;

/// Type-erased descriptor for one [`Shape`].
#[derive(Clone, Copy)]
pub struct Schema {
    token: &'static str,
    kind: CommandKind,
    accepts: AcceptsFn,
    decode: DecodeFn,
    encode: EncodeFn,
    validate: ValidateFn,
}

impl Schema {
    /// Descriptor for shape `S`.
    pub fn of<S: Shape>() -> Self {
        Schema {
            token: S::TOKEN,
            kind: S::KIND,
            accepts: S::accepts,
            decode: |line| S::decode(line).into(),
            encode: |command| S::peel(command).map(S::encode),
            validate: |command, caps| S::peel(command).map(|shape| shape.validate(caps)),
        }
    }

    /// Command token this schema answers to.
    pub fn token(&self) -> &'static str {
        self.token
    }

    /// Variant this schema produces.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// True if the command token matches (case-insensitively) and the
    /// shape's predicate accepts the parameters under `caps`.
    pub fn matches(&self, line: &RawLine, caps: &ServerCapabilities) -> bool {
        line.command().eq_ignore_ascii_case(self.token) && (self.accepts)(line, caps)
    }

    /// Decode `line`; callers check [`Schema::matches`] first.
    pub fn decode(&self, line: &RawLine) -> Command {
        (self.decode)(line)
    }

    /// Validate then encode `command`'s parameters.
    ///
    /// `command` must be of this schema's variant.
    pub fn encode(
        &self,
        command: &Command,
        caps: &ServerCapabilities,
    ) -> Result<Vec<String>, MessageError> {
        let unregistered = || MessageError::Unregistered(command.kind());
        (self.validate)(command, caps).ok_or_else(unregistered)??;
        (self.encode)(command).ok_or_else(unregistered)?
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("token", &self.token)
            .field("kind", &self.kind)
            .finish()
    }
}
