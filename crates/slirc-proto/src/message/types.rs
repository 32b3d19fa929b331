//! The message envelope.

use crate::command::{
    Command, CommandKind, Ison, Join, MonitorAdd, MonitorRemove, Nick, Notice, Pass, Pong,
    Privmsg, Quit, User, WatchEdit,
};
use crate::prefix::Prefix;

/// A typed protocol message: optional source plus a [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Message source (`:nick!user@host` or a server name).
    pub prefix: Option<Prefix>,
    /// The decoded body.
    pub command: Command,
}

impl Message {
    /// A message without a source, as clients send them.
    pub fn new(command: impl Into<Command>) -> Self {
        Message {
            prefix: None,
            command: command.into(),
        }
    }

    /// Attach a source prefix.
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Tag of the body's variant.
    pub fn kind(&self) -> CommandKind {
        self.command.kind()
    }

    /// Nickname of the sender, if the source is a user.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }

    /// `PASS <password>`
    pub fn pass(password: impl Into<String>) -> Self {
        Self::new(Pass {
            password: password.into(),
        })
    }

    /// `NICK <nickname>`
    pub fn nick(nickname: impl Into<String>) -> Self {
        Self::new(Nick {
            nickname: nickname.into(),
        })
    }

    /// `USER <username> 0 * :<realname>`
    pub fn user(username: impl Into<String>, realname: impl Into<String>) -> Self {
        Self::new(User {
            username: username.into(),
            mode: 0,
            realname: realname.into(),
        })
    }

    /// `PONG <token>`
    pub fn pong(token: impl Into<String>) -> Self {
        Self::new(Pong {
            server: String::new(),
            token: token.into(),
        })
    }

    /// `QUIT [:<reason>]`
    pub fn quit(reason: impl Into<String>) -> Self {
        Self::new(Quit {
            reason: reason.into(),
        })
    }

    /// `JOIN <channel>`
    pub fn join(channel: impl Into<String>) -> Self {
        Self::new(Join {
            channels: vec![channel.into()],
            keys: Vec::new(),
        })
    }

    /// `PRIVMSG <target> :<text>`
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Privmsg {
            target: target.into(),
            text: text.into(),
        })
    }

    /// `NOTICE <target> :<text>`
    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Notice {
            target: target.into(),
            text: text.into(),
        })
    }

    /// `ISON :<nicks>`
    pub fn ison(nicks: Vec<String>) -> Self {
        Self::new(Ison { nicks })
    }

    /// `WATCH +a +b -c`
    pub fn watch(added: Vec<String>, removed: Vec<String>) -> Self {
        Self::new(WatchEdit { added, removed })
    }

    /// `MONITOR + a,b`
    pub fn monitor_add(nicks: Vec<String>) -> Self {
        Self::new(MonitorAdd { nicks })
    }

    /// `MONITOR - a,b`
    pub fn monitor_remove(nicks: Vec<String>) -> Self {
        Self::new(MonitorRemove { nicks })
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Message::new(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_nickname() {
        let msg = Message::privmsg("#a", "hi").with_prefix(Prefix::parse("alice!a@h"));
        assert_eq!(msg.source_nickname(), Some("alice"));
        assert_eq!(msg.kind(), CommandKind::Privmsg);

        let msg = Message::pong("x").with_prefix(Prefix::parse("irc.example.net"));
        assert_eq!(msg.source_nickname(), None);
    }
}
