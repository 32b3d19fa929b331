//! Source prefix parsing.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::str::FromStr;

/// Origin of a message: a server name or a user mask.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prefix {
    /// Server name (e.g. `irc.example.com`).
    Server(String),
    /// User mask; user and host are absent in the short `nick` form.
    User {
        /// Nickname.
        nick: String,
        /// Username (ident).
        user: Option<String>,
        /// Hostname.
        host: Option<String>,
    },
}

impl Prefix {
    /// Lenient parse; never fails and does not validate the components.
    ///
    /// A bare word containing a dot is taken as a server name, anything else
    /// as a nickname with optional `!user` and `@host` parts.
    pub fn parse(s: &str) -> Self {
        let (before_host, host) = match s.split_once('@') {
            Some((before, host)) => (before, Some(host)),
            None => (s, None),
        };
        let (nick, user) = match before_host.split_once('!') {
            Some((nick, user)) => (nick, Some(user)),
            None => (before_host, None),
        };

        if user.is_none() && host.is_none() && nick.contains('.') {
            return Prefix::Server(nick.to_owned());
        }

        Prefix::User {
            nick: nick.to_owned(),
            user: user.map(str::to_owned),
            host: host.map(str::to_owned),
        }
    }

    /// Build a full `nick!user@host` mask.
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::User {
            nick: nick.into(),
            user: Some(user.into()),
            host: Some(host.into()),
        }
    }

    /// Nickname, if this is a non-empty user mask.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::User { nick, .. } if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }

    /// Username, if present.
    pub fn user(&self) -> Option<&str> {
        match self {
            Prefix::User { user, .. } => user.as_deref().filter(|u| !u.is_empty()),
            Prefix::Server(_) => None,
        }
    }

    /// Hostname, or the server name for server prefixes.
    pub fn host(&self) -> Option<&str> {
        match self {
            Prefix::Server(name) => Some(name),
            Prefix::User { host, .. } => host.as_deref().filter(|h| !h.is_empty()),
        }
    }

    /// True for server-name prefixes.
    pub fn is_server(&self) -> bool {
        matches!(self, Prefix::Server(_))
    }
}

impl FromStr for Prefix {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Prefix::parse(s))
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Prefix::parse(s)
    }
}
