//! Numeric reply shapes.
//!
//! The first parameter of every numeric is the client's own nickname
//! (`target`). Optional trailing parameters that the server leaves out
//! decode as empty values.

use chrono::{DateTime, Utc};

use crate::error::MessageError;
use crate::message::RawLine;
use crate::prefix::Prefix;
use crate::schema::Shape;

use super::util::{arg_string, join_list, join_words, parse_count, push_opt, require, split_list, split_words};

/// `<code> <target> :<text>`
macro_rules! text_reply {
    ($(#[$meta:meta])* $name:ident, $code:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name {
            /// Our nickname.
            pub target: String,
            /// Human-readable text.
            pub text: String,
        }

        impl Shape for $name {
            const TOKEN: &'static str = $code;

            fn decode(line: &RawLine) -> Self {
                $name {
                    target: line.arg(0).to_owned(),
                    text: line.arg(1).to_owned(),
                }
            }

            fn encode(&self) -> Result<Vec<String>, MessageError> {
                Ok(vec![self.target.clone(), self.text.clone()])
            }
        }
    };
}

/// `<code> <target> <subject> :<text>`
macro_rules! subject_reply {
    ($(#[$meta:meta])* $name:ident, $code:literal, $subject:ident, $text:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name {
            /// Our nickname.
            pub target: String,
            #[allow(missing_docs)]
            pub $subject: String,
            #[allow(missing_docs)]
            pub $text: String,
        }

        impl Shape for $name {
            const TOKEN: &'static str = $code;

            fn decode(line: &RawLine) -> Self {
                $name {
                    target: line.arg(0).to_owned(),
                    $subject: line.arg(1).to_owned(),
                    $text: line.arg(2).to_owned(),
                }
            }

            fn encode(&self) -> Result<Vec<String>, MessageError> {
                Ok(vec![
                    self.target.clone(),
                    self.$subject.clone(),
                    self.$text.clone(),
                ])
            }
        }
    };
}

/// `<code> <target> <nick>{,<nick>}`
macro_rules! nick_list_reply {
    ($(#[$meta:meta])* $name:ident, $code:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name {
            /// Our nickname.
            pub target: String,
            /// Nicknames in the reply.
            pub nicks: Vec<String>,
        }

        impl Shape for $name {
            const TOKEN: &'static str = $code;

            fn decode(line: &RawLine) -> Self {
                $name {
                    target: line.arg(0).to_owned(),
                    nicks: split_list(line.arg(1)),
                }
            }

            fn encode(&self) -> Result<Vec<String>, MessageError> {
                Ok(vec![self.target.clone(), join_list(&self.nicks)?])
            }
        }
    };
}

/// Body shared by the `WATCH` status numerics (600-605).
///
/// `<code> <target> <nick> <user> <host> <since> :<text>`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchedUser {
    /// Our nickname.
    pub target: String,
    /// Watched nickname.
    pub nick: String,
    /// Username, `*` when unknown.
    pub user: String,
    /// Hostname, `*` when unknown.
    pub host: String,
    /// Unix time of the status change, 0 when unknown.
    pub since: i64,
    /// Human-readable text.
    pub text: String,
}

impl WatchedUser {
    fn decode(line: &RawLine) -> Self {
        WatchedUser {
            target: line.arg(0).to_owned(),
            nick: line.arg(1).to_owned(),
            user: line.arg(2).to_owned(),
            host: line.arg(3).to_owned(),
            since: parse_count(line.arg(4)),
            text: line.arg(5).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("nick", &self.nick)?;
        Ok(vec![
            self.target.clone(),
            self.nick.clone(),
            self.user.clone(),
            self.host.clone(),
            self.since.to_string(),
            self.text.clone(),
        ])
    }

    /// Time of the status change, if the server reported one.
    pub fn changed_at(&self) -> Option<DateTime<Utc>> {
        if self.since <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.since, 0)
    }

    /// The `nick!user@host` mask, or the bare nickname when the server did
    /// not know the user and host.
    pub fn mask(&self) -> Prefix {
        if self.user.is_empty() || self.user == "*" {
            Prefix::User {
                nick: self.nick.clone(),
                user: None,
                host: None,
            }
        } else {
            Prefix::new(&self.nick, &self.user, &self.host)
        }
    }
}

macro_rules! watch_reply {
    ($(#[$meta:meta])* $name:ident, $code:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name(pub WatchedUser);

        impl Shape for $name {
            const TOKEN: &'static str = $code;

            fn decode(line: &RawLine) -> Self {
                $name(WatchedUser::decode(line))
            }

            fn encode(&self) -> Result<Vec<String>, MessageError> {
                self.0.encode()
            }
        }

        impl std::ops::Deref for $name {
            type Target = WatchedUser;

            fn deref(&self) -> &WatchedUser {
                &self.0
            }
        }
    };
}

text_reply!(
    /// `001 RPL_WELCOME`
    Welcome,
    "001"
);
text_reply!(
    /// `323 RPL_LISTEND`
    ListEnd,
    "323"
);
text_reply!(
    /// `376 RPL_ENDOFMOTD`
    EndOfMotd,
    "376"
);
text_reply!(
    /// `422 ERR_NOMOTD`
    NoMotd,
    "422"
);
text_reply!(
    /// `733 RPL_ENDOFMONLIST`
    EndOfMonList,
    "733"
);

subject_reply!(
    /// `301 RPL_AWAY`: `nick` is away with `message`.
    AwayReply,
    "301",
    nick,
    message
);
subject_reply!(
    /// `332 RPL_TOPIC`
    TopicReply,
    "332",
    channel,
    topic
);
subject_reply!(
    /// `366 RPL_ENDOFNAMES`
    EndOfNames,
    "366",
    channel,
    text
);
subject_reply!(
    /// `401 ERR_NOSUCHNICK`
    NoSuchNick,
    "401",
    nick,
    text
);
subject_reply!(
    /// `433 ERR_NICKNAMEINUSE`
    NicknameInUse,
    "433",
    nick,
    text
);
subject_reply!(
    /// `512 ERR_TOOMANYWATCH`: `nick` did not fit in the watch list.
    TooManyWatch,
    "512",
    nick,
    text
);
subject_reply!(
    /// `819 RPL_PROPEND`
    PropEnd,
    "819",
    channel,
    text
);

nick_list_reply!(
    /// `731 RPL_MONOFFLINE`
    MonOffline,
    "731"
);
nick_list_reply!(
    /// `732 RPL_MONLIST`
    MonList,
    "732"
);

watch_reply!(
    /// `600 RPL_LOGON`: a watched user came online.
    WatchLogon,
    "600"
);
watch_reply!(
    /// `601 RPL_LOGOFF`: a watched user went offline.
    WatchLogoff,
    "601"
);
watch_reply!(
    /// `602 RPL_WATCHOFF`: a user was removed from the watch list.
    WatchStopped,
    "602"
);
watch_reply!(
    /// `604 RPL_NOWON`: a newly watched user is online.
    WatchNowOn,
    "604"
);
watch_reply!(
    /// `605 RPL_NOWOFF`: a newly watched user is offline.
    WatchNowOff,
    "605"
);

/// `005 RPL_ISUPPORT <target> <token>... :are supported by this server`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Isupport {
    /// Our nickname.
    pub target: String,
    /// Raw `KEY`, `KEY=VALUE` and `-KEY` tokens.
    pub tokens: Vec<String>,
    /// Trailing text; only recognised when it contains a space.
    pub text: String,
}

impl Shape for Isupport {
    const TOKEN: &'static str = "005";

    fn decode(line: &RawLine) -> Self {
        let mut rest = line.args_from(1);
        let mut text = String::new();
        if let Some((last, init)) = rest.split_last() {
            if last.contains(' ') {
                text = last.clone();
                rest = init;
            }
        }
        Isupport {
            target: line.arg(0).to_owned(),
            tokens: rest.to_vec(),
            text,
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        let mut params = vec![self.target.clone()];
        params.extend(self.tokens.iter().cloned());
        push_opt(&mut params, &self.text);
        Ok(params)
    }
}

/// `303 RPL_ISON <target> :<nick> {<nick>}`: the online subset of an
/// `ISON` query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IsonReply {
    /// Our nickname.
    pub target: String,
    /// Nicknames reported online.
    pub nicks: Vec<String>,
}

impl Shape for IsonReply {
    const TOKEN: &'static str = "303";

    fn decode(line: &RawLine) -> Self {
        IsonReply {
            target: line.arg(0).to_owned(),
            nicks: line
                .args_from(1)
                .iter()
                .map(String::as_str)
                .flat_map(split_words)
                .collect(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        Ok(vec![self.target.clone(), join_words(&self.nicks)?])
    }
}

/// `322 RPL_LIST <target> <channel> <users> :<topic>`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListItem {
    /// Our nickname.
    pub target: String,
    /// Channel.
    pub channel: String,
    /// Visible member count, 0 when malformed.
    pub users: u32,
    /// Topic.
    pub topic: String,
}

impl Shape for ListItem {
    const TOKEN: &'static str = "322";

    fn decode(line: &RawLine) -> Self {
        ListItem {
            target: line.arg(0).to_owned(),
            channel: line.arg(1).to_owned(),
            users: parse_count(line.arg(2)),
            topic: line.arg(3).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        Ok(vec![
            self.target.clone(),
            self.channel.clone(),
            self.users.to_string(),
            self.topic.clone(),
        ])
    }
}

/// `353 RPL_NAMREPLY <target> <visibility> <channel> :<names>`
///
/// Some servers omit the visibility symbol; it then decodes as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamesReply {
    /// Our nickname.
    pub target: String,
    /// `=` public, `*` private, `@` secret.
    pub visibility: String,
    /// Channel.
    pub channel: String,
    /// Members, with their status prefixes.
    pub names: Vec<String>,
}

impl Shape for NamesReply {
    const TOKEN: &'static str = "353";

    fn decode(line: &RawLine) -> Self {
        let (visibility, rest) = if line.len() >= 4 {
            (line.arg(1).to_owned(), 2)
        } else {
            (String::new(), 1)
        };
        NamesReply {
            target: line.arg(0).to_owned(),
            visibility,
            channel: arg_string(line.params(), rest),
            names: split_words(line.arg(rest + 1)),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        let mut params = vec![self.target.clone()];
        push_opt(&mut params, &self.visibility);
        params.push(self.channel.clone());
        params.push(join_words(&self.names)?);
        Ok(params)
    }
}

/// `730 RPL_MONONLINE <target> :<mask>{,<mask>}`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonOnline {
    /// Our nickname.
    pub target: String,
    /// Users now online, as `nick!user@host` or bare nicknames.
    pub users: Vec<Prefix>,
}

impl Shape for MonOnline {
    const TOKEN: &'static str = "730";

    fn decode(line: &RawLine) -> Self {
        MonOnline {
            target: line.arg(0).to_owned(),
            users: line.arg(1).split(',').filter(|s| !s.is_empty()).map(Prefix::parse).collect(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        let masks: Vec<String> = self.users.iter().map(Prefix::to_string).collect();
        Ok(vec![self.target.clone(), join_list(&masks)?])
    }
}

/// `734 ERR_MONLISTFULL <target> <limit> <nicks> :<text>`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonListFull {
    /// Our nickname.
    pub target: String,
    /// Server's monitor list limit.
    pub limit: u32,
    /// Nicknames that were not added.
    pub nicks: Vec<String>,
    /// Human-readable text.
    pub text: String,
}

impl Shape for MonListFull {
    const TOKEN: &'static str = "734";

    fn decode(line: &RawLine) -> Self {
        MonListFull {
            target: line.arg(0).to_owned(),
            limit: parse_count(line.arg(1)),
            nicks: split_list(line.arg(2)),
            text: line.arg(3).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        Ok(vec![
            self.target.clone(),
            self.limit.to_string(),
            join_list(&self.nicks)?,
            self.text.clone(),
        ])
    }
}

/// `818 RPL_PROPLIST <target> <channel> [<property> [:<value>]]`
///
/// Truncated replies decode with empty property and value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropReply {
    /// Our nickname.
    pub target: String,
    /// Channel owning the property.
    pub channel: String,
    /// Property name.
    pub property: String,
    /// Property value.
    pub value: String,
}

impl Shape for PropReply {
    const TOKEN: &'static str = "818";

    fn decode(line: &RawLine) -> Self {
        PropReply {
            target: line.arg(0).to_owned(),
            channel: line.arg(1).to_owned(),
            property: line.arg(2).to_owned(),
            value: line.arg(3).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("target", &self.target)?;
        require("channel", &self.channel)?;
        if !self.value.is_empty() {
            require("property", &self.property)?;
        }
        let mut params = vec![self.target.clone(), self.channel.clone()];
        push_opt(&mut params, &self.property);
        push_opt(&mut params, &self.value);
        Ok(params)
    }
}
