//! ISUPPORT token parsing.

/// A single ISUPPORT token.
///
/// A token is a bare key (`EXCEPTS`), a key with a value
/// (`NETWORK=Libera.Chat`) or a negation (`-WATCH`) withdrawing an earlier
/// advertisement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IsupportEntry<'a> {
    /// Key advertised, with an optional value.
    Set {
        /// The token key (e.g. `NETWORK`).
        key: &'a str,
        /// The value after `=`, if any. `KEY=` yields `Some("")`.
        value: Option<&'a str>,
    },
    /// Key withdrawn.
    Negated(&'a str),
}

/// Parse one token; empty tokens and bare `-` yield `None`.
pub fn parse_token(token: &str) -> Option<IsupportEntry<'_>> {
    if let Some(key) = token.strip_prefix('-') {
        let key = key.split('=').next().unwrap_or("");
        return (!key.is_empty()).then_some(IsupportEntry::Negated(key));
    }

    let (key, value) = match token.split_once('=') {
        Some((k, v)) => (k, Some(v)),
        None => (token, None),
    };

    (!key.is_empty()).then_some(IsupportEntry::Set { key, value })
}
