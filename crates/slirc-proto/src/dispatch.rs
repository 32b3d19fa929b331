//! Line-to-message decoding and message-to-line encoding.

use crate::command::Command;
use crate::error::{MessageError, ProtocolError, Result};
use crate::isupport::ServerCapabilities;
use crate::message::{tokenize, Message, MAX_PARAMS};
use crate::prefix::Prefix;
use crate::schema::Catalog;

/// Returns true if the parameter needs a colon prefix.
pub fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

/// Walks a [`Catalog`] to decode lines and encodes messages back to the
/// canonical wire form.
///
/// Encoding validates against the [`ServerCapabilities`] held here, which
/// start empty and are replaced once registration completes.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    catalog: Catalog,
    caps: ServerCapabilities,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Catalog::standard())
    }
}

impl Dispatcher {
    /// Dispatcher over `catalog` with no capabilities.
    pub fn new(catalog: Catalog) -> Self {
        Dispatcher {
            catalog,
            caps: ServerCapabilities::new(),
        }
    }

    /// Builder: validate outgoing messages against `caps`.
    pub fn with_capabilities(mut self, caps: ServerCapabilities) -> Self {
        self.caps = caps;
        self
    }

    /// Replace the capabilities used for validation.
    pub fn set_capabilities(&mut self, caps: ServerCapabilities) {
        self.caps = caps;
    }

    /// Capabilities used for validation.
    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.caps
    }

    /// The schema table.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Decode one raw line.
    ///
    /// Returns `None` for a malformed line (nothing to tokenize). A line no
    /// schema accepts decodes to [`Command::Unknown`].
    pub fn decode(&self, line: &str) -> Option<Message> {
        let raw = tokenize(line);
        if raw.is_empty() {
            return None;
        }

        let prefix = raw.prefix().map(Prefix::parse);
        let command = match self.catalog.select(&raw, &self.caps) {
            Some(schema) => schema.decode(&raw),
            None => Command::Unknown(raw),
        };

        Some(Message { prefix, command })
    }

    /// Encode `message` to a wire line without the terminator.
    ///
    /// Fails with [`ProtocolError::InvalidMessage`] before producing any
    /// output if a required field is empty, a capability is missing or a
    /// parameter cannot be represented. [`Command::Unknown`] is written out
    /// verbatim, subject to the same wire checks.
    pub fn encode(&self, message: &Message) -> Result<String> {
        let (token, params) = match &message.command {
            Command::Unknown(raw) => (raw.command().to_owned(), raw.params().to_vec()),
            command => {
                let kind = command.kind();
                let schema = self.catalog.schema_for(kind).ok_or_else(|| {
                    ProtocolError::InvalidMessage {
                        command: format!("{:?}", kind),
                        cause: MessageError::Unregistered(kind),
                    }
                })?;
                let params = schema.encode(command, &self.caps).map_err(|cause| {
                    ProtocolError::InvalidMessage {
                        command: schema.token().to_owned(),
                        cause,
                    }
                })?;
                (schema.token().to_owned(), params)
            }
        };

        write_line(message.prefix.as_ref(), &token, &params).map_err(|cause| {
            ProtocolError::InvalidMessage {
                command: token.clone(),
                cause,
            }
        })
    }
}

fn check_chars(s: &str) -> std::result::Result<(), MessageError> {
    if s.contains(['\r', '\n', '\0']) {
        Err(MessageError::IllegalParameter(s.to_owned()))
    } else {
        Ok(())
    }
}

/// Join source, token and parameters into one line.
///
/// Only the last parameter may be empty, contain spaces or start with `:`;
/// it is colon-prefixed when it needs to be.
fn write_line(
    prefix: Option<&Prefix>,
    token: &str,
    params: &[String],
) -> std::result::Result<String, MessageError> {
    if token.is_empty() || token.contains(' ') {
        return Err(MessageError::MissingField("command"));
    }
    check_chars(token)?;
    if params.len() > MAX_PARAMS {
        return Err(MessageError::TooManyParameters(params.len()));
    }

    let mut line = String::with_capacity(64);

    if let Some(prefix) = prefix {
        let source = prefix.to_string();
        check_chars(&source)?;
        if source.is_empty() || source.contains(' ') {
            return Err(MessageError::IllegalParameter(source));
        }
        line.push(':');
        line.push_str(&source);
        line.push(' ');
    }

    line.push_str(token);

    if let Some((last, middles)) = params.split_last() {
        for param in middles {
            check_chars(param)?;
            if needs_colon_prefix(param) {
                return Err(MessageError::IllegalParameter(param.clone()));
            }
            line.push(' ');
            line.push_str(param);
        }

        check_chars(last)?;
        line.push(' ');
        if needs_colon_prefix(last) {
            line.push(':');
        }
        line.push_str(last);
    }

    Ok(line)
}
