use std::collections::HashMap;

use super::parser::{parse_token, IsupportEntry};

/// Count reported for a capability advertised without a limit.
pub const UNLIMITED: usize = usize::MAX;

/// Capabilities negotiated with the server.
///
/// Accumulated from every `RPL_ISUPPORT` line received during registration;
/// keys are compared case-insensitively. Read-only once registration ends.
///
/// # Example
///
/// ```
/// use slirc_proto::ServerCapabilities;
///
/// let caps = ServerCapabilities::from_tokens(["NETWORK=TestNet", "MONITOR=100", "ELIST=CMNTU"]);
/// assert_eq!(caps.network(), Some("TestNet"));
/// assert_eq!(caps.max_monitors(), Some(100));
/// assert!(caps.supports_elist('u'));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerCapabilities {
    tokens: HashMap<String, Option<String>>,
}

impl ServerCapabilities {
    /// No capabilities advertised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from bare tokens such as `WATCH=128`.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut caps = Self::new();
        for token in tokens {
            caps.apply_token(token.as_ref());
        }
        caps
    }

    /// Builder: advertise `key=value`.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.tokens
            .insert(key.to_ascii_uppercase(), Some(value.to_string()));
        self
    }

    /// Builder: advertise a bare `key`.
    pub fn with_flag(mut self, key: &str) -> Self {
        self.tokens.insert(key.to_ascii_uppercase(), None);
        self
    }

    /// Absorb the parameters of one `RPL_ISUPPORT` reply.
    ///
    /// The first parameter (our nickname) and a trailing human-readable text
    /// parameter are skipped.
    pub fn absorb(&mut self, params: &[String]) {
        let mut tokens = params.get(1..).unwrap_or(&[]);
        if let Some((last, rest)) = tokens.split_last() {
            if last.contains(' ') {
                tokens = rest;
            }
        }
        for token in tokens {
            self.apply_token(token);
        }
    }

    /// Apply one token, honouring `-KEY` negation.
    pub fn apply_token(&mut self, token: &str) {
        match parse_token(token) {
            Some(IsupportEntry::Set { key, value }) => {
                self.tokens
                    .insert(key.to_ascii_uppercase(), value.map(str::to_owned));
            }
            Some(IsupportEntry::Negated(key)) => {
                self.tokens.remove(&key.to_ascii_uppercase());
            }
            None => {}
        }
    }

    /// `Some(Some(value))` for `KEY=value`, `Some(None)` for a bare key,
    /// `None` if not advertised.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.tokens
            .get(&key.to_ascii_uppercase())
            .map(|v| v.as_deref())
    }

    /// True if `key` was advertised in any form.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of advertised keys.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if nothing was advertised.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn count(&self, key: &str) -> Option<usize> {
        match self.get(key)? {
            None | Some("") => Some(UNLIMITED),
            Some(v) => Some(v.parse().unwrap_or(0)),
        }
    }

    /// `WATCH` list size; [`UNLIMITED`] for a bare token, 0 if unparseable.
    pub fn max_watches(&self) -> Option<usize> {
        self.count("WATCH")
    }

    /// `MONITOR` list size; [`UNLIMITED`] for a bare token, 0 if unparseable.
    pub fn max_monitors(&self) -> Option<usize> {
        self.count("MONITOR")
    }

    /// Extended `LIST` filter letters, uppercased (`ELIST=CMNTU`).
    pub fn elist(&self) -> String {
        self.get("ELIST")
            .flatten()
            .unwrap_or("")
            .to_ascii_uppercase()
    }

    /// True if the `ELIST` token includes `letter`.
    pub fn supports_elist(&self, letter: char) -> bool {
        self.elist().contains(letter.to_ascii_uppercase())
    }

    /// `NETWORK` name.
    pub fn network(&self) -> Option<&str> {
        self.get("NETWORK").flatten()
    }

    /// `CASEMAPPING` value (e.g. `rfc1459`).
    pub fn casemapping(&self) -> Option<&str> {
        self.get("CASEMAPPING").flatten()
    }

    /// `CHANTYPES`, defaulting to `#&+!`.
    pub fn chantypes(&self) -> &str {
        self.get("CHANTYPES")
            .flatten()
            .unwrap_or(crate::chan::DEFAULT_CHANTYPES)
    }
}
