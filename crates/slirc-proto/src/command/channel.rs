//! Channel operation shapes.

use crate::chan::is_channel_name_with;
use crate::error::MessageError;
use crate::isupport::ServerCapabilities;
use crate::message::RawLine;
use crate::mode::{self, ChannelMode, ModeChange, UserMode};
use crate::schema::Shape;

use super::util::{join_list, push_opt, require, require_list, split_list};

/// `JOIN <channel>{,<channel>} [<key>{,<key>}]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Join {
    /// Channels to join.
    pub channels: Vec<String>,
    /// Keys, positionally matching `channels`.
    pub keys: Vec<String>,
}

impl Shape for Join {
    const TOKEN: &'static str = "JOIN";

    fn decode(line: &RawLine) -> Self {
        Join {
            channels: split_list(line.arg(0)),
            keys: split_list(line.arg(1)),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require_list("channels", &self.channels)?;
        let mut params = vec![join_list(&self.channels)?];
        push_opt(&mut params, &join_list(&self.keys)?);
        Ok(params)
    }
}

/// `PART <channel>{,<channel>} [:<reason>]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Part {
    /// Channels to leave.
    pub channels: Vec<String>,
    /// Part message; empty when absent.
    pub reason: String,
}

impl Shape for Part {
    const TOKEN: &'static str = "PART";

    fn decode(line: &RawLine) -> Self {
        Part {
            channels: split_list(line.arg(0)),
            reason: line.arg(1).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require_list("channels", &self.channels)?;
        let mut params = vec![join_list(&self.channels)?];
        push_opt(&mut params, &self.reason);
        Ok(params)
    }
}

/// `TOPIC <channel> [:<topic>]`
///
/// `topic: None` queries the topic, `Some("")` clears it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topic {
    /// Channel.
    pub channel: String,
    /// New topic.
    pub topic: Option<String>,
}

impl Shape for Topic {
    const TOKEN: &'static str = "TOPIC";

    fn decode(line: &RawLine) -> Self {
        Topic {
            channel: line.arg(0).to_owned(),
            topic: line.params().get(1).cloned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("channel", &self.channel)?;
        let mut params = vec![self.channel.clone()];
        params.extend(self.topic.clone());
        Ok(params)
    }
}

/// `KICK <channel> <nick> [:<reason>]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kick {
    /// Channel.
    pub channel: String,
    /// Member to remove.
    pub nick: String,
    /// Kick message; empty when absent.
    pub reason: String,
}

impl Shape for Kick {
    const TOKEN: &'static str = "KICK";

    fn decode(line: &RawLine) -> Self {
        Kick {
            channel: line.arg(0).to_owned(),
            nick: line.arg(1).to_owned(),
            reason: line.arg(2).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("channel", &self.channel)?;
        require("nick", &self.nick)?;
        let mut params = vec![self.channel.clone(), self.nick.clone()];
        push_opt(&mut params, &self.reason);
        Ok(params)
    }
}

/// `INVITE <nick> <channel>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invite {
    /// Invitee.
    pub nick: String,
    /// Channel.
    pub channel: String,
}

impl Shape for Invite {
    const TOKEN: &'static str = "INVITE";

    fn decode(line: &RawLine) -> Self {
        Invite {
            nick: line.arg(0).to_owned(),
            channel: line.arg(1).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("nick", &self.nick)?;
        require("channel", &self.channel)?;
        Ok(vec![self.nick.clone(), self.channel.clone()])
    }
}

/// `KNOCK <channel> [:<reason>]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Knock {
    /// Channel to request an invite to.
    pub channel: String,
    /// Request text; empty when absent.
    pub reason: String,
}

impl Shape for Knock {
    const TOKEN: &'static str = "KNOCK";

    fn decode(line: &RawLine) -> Self {
        Knock {
            channel: line.arg(0).to_owned(),
            reason: line.arg(1).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("channel", &self.channel)?;
        let mut params = vec![self.channel.clone()];
        push_opt(&mut params, &self.reason);
        Ok(params)
    }
}

/// `NAMES [<channel>{,<channel>}]`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Names {
    /// Channels to list; empty for all visible.
    pub channels: Vec<String>,
}

impl Shape for Names {
    const TOKEN: &'static str = "NAMES";

    fn decode(line: &RawLine) -> Self {
        Names {
            channels: split_list(line.arg(0)),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        let mut params = Vec::new();
        push_opt(&mut params, &join_list(&self.channels)?);
        Ok(params)
    }
}

/// `LIST [<channel>{,<channel>}]`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct List {
    /// Channels to list; empty for all.
    pub channels: Vec<String>,
}

impl Shape for List {
    const TOKEN: &'static str = "LIST";

    fn accepts(line: &RawLine, caps: &ServerCapabilities) -> bool {
        !ListFilter::accepts(line, caps)
    }

    fn decode(line: &RawLine) -> Self {
        List {
            channels: split_list(line.arg(0)),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        let mut params = Vec::new();
        push_opt(&mut params, &join_list(&self.channels)?);
        Ok(params)
    }
}

/// Sigils introducing an extended `LIST` filter term.
const FILTER_SIGILS: [&str; 8] = ["C<", "C>", "T<", "T>", "<", ">", "!*", "*"];

/// `LIST <filter>{,<filter>}` with `ELIST` extended filters.
///
/// `None` marks a filter that is not set. Times are in minutes; masks are
/// stored without their surrounding `*`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// `<n`: fewer than `n` users.
    pub max_users: Option<u32>,
    /// `>n`: more than `n` users.
    pub min_users: Option<u32>,
    /// `C<n`: created less than `n` minutes ago.
    pub younger_than: Option<u32>,
    /// `C>n`: created more than `n` minutes ago.
    pub older_than: Option<u32>,
    /// `T<n`: topic changed less than `n` minutes ago.
    pub topic_younger_than: Option<u32>,
    /// `T>n`: topic changed more than `n` minutes ago.
    pub topic_older_than: Option<u32>,
    /// `*mask*`: channel name matches.
    pub match_mask: Option<String>,
    /// `!*mask*`: channel name does not match.
    pub not_match_mask: Option<String>,
}

impl ListFilter {
    fn is_empty(&self) -> bool {
        *self == ListFilter::default()
    }

    fn apply(&mut self, term: &str) {
        let count = |s: &str| s.trim().parse::<u32>().ok();
        let mask = |s: &str| {
            let s = s.strip_prefix('*').unwrap_or(s);
            s.strip_suffix('*').unwrap_or(s).to_owned()
        };

        if let Some(v) = term.strip_prefix("C<") {
            self.younger_than = count(v);
        } else if let Some(v) = term.strip_prefix("C>") {
            self.older_than = count(v);
        } else if let Some(v) = term.strip_prefix("T<") {
            self.topic_younger_than = count(v);
        } else if let Some(v) = term.strip_prefix("T>") {
            self.topic_older_than = count(v);
        } else if let Some(v) = term.strip_prefix('<') {
            self.max_users = count(v);
        } else if let Some(v) = term.strip_prefix('>') {
            self.min_users = count(v);
        } else if let Some(v) = term.strip_prefix('!') {
            self.not_match_mask = Some(mask(v));
        } else if term.starts_with('*') {
            self.match_mask = Some(mask(term));
        }
    }
}

impl Shape for ListFilter {
    const TOKEN: &'static str = "LIST";

    fn accepts(line: &RawLine, _caps: &ServerCapabilities) -> bool {
        let first = line.arg(0);
        FILTER_SIGILS.iter().any(|sigil| first.starts_with(sigil))
    }

    fn decode(line: &RawLine) -> Self {
        let mut filter = ListFilter::default();
        for term in line.arg(0).split(',') {
            filter.apply(term);
        }
        filter
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        if self.is_empty() {
            return Err(MessageError::MissingField("filter"));
        }

        let mut terms = Vec::new();
        let counts = [
            ("<", self.max_users),
            (">", self.min_users),
            ("C<", self.younger_than),
            ("C>", self.older_than),
            ("T<", self.topic_younger_than),
            ("T>", self.topic_older_than),
        ];
        for (sigil, value) in counts {
            if let Some(n) = value {
                terms.push(format!("{}{}", sigil, n));
            }
        }
        for (sigil, mask) in [("*", &self.match_mask), ("!*", &self.not_match_mask)] {
            if let Some(mask) = mask {
                if mask.contains(',') || mask.contains(' ') {
                    return Err(MessageError::IllegalParameter(mask.clone()));
                }
                terms.push(format!("{}{}*", sigil, mask));
            }
        }

        Ok(vec![terms.join(",")])
    }

    fn validate(&self, caps: &ServerCapabilities) -> Result<(), MessageError> {
        let needs = [
            ('U', self.max_users.is_some() || self.min_users.is_some(), "ELIST=U"),
            ('C', self.younger_than.is_some() || self.older_than.is_some(), "ELIST=C"),
            (
                'T',
                self.topic_younger_than.is_some() || self.topic_older_than.is_some(),
                "ELIST=T",
            ),
            ('M', self.match_mask.is_some(), "ELIST=M"),
            ('N', self.not_match_mask.is_some(), "ELIST=N"),
        ];
        for (letter, used, feature) in needs {
            if used && !caps.supports_elist(letter) {
                return Err(MessageError::UnsupportedFeature(feature));
            }
        }
        Ok(())
    }
}

/// `MODE <channel> [<modes> {<param>}]`
///
/// Empty `changes` queries the channel modes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelModeChange {
    /// Channel.
    pub channel: String,
    /// Ordered mode changes with their threaded parameters.
    pub changes: Vec<ModeChange<ChannelMode>>,
}

impl Shape for ChannelModeChange {
    const TOKEN: &'static str = "MODE";

    fn accepts(line: &RawLine, caps: &ServerCapabilities) -> bool {
        is_channel_name_with(line.arg(0), caps.chantypes())
    }

    fn decode(line: &RawLine) -> Self {
        ChannelModeChange {
            channel: line.arg(0).to_owned(),
            changes: mode::decode(line.arg(1), line.args_from(2)),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("channel", &self.channel)?;
        encode_mode(&self.channel, &self.changes)
    }
}

/// `MODE <nick> [<modes>]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserModeChange {
    /// Target nickname.
    pub nick: String,
    /// Ordered mode changes.
    pub changes: Vec<ModeChange<UserMode>>,
}

impl Shape for UserModeChange {
    const TOKEN: &'static str = "MODE";

    fn accepts(line: &RawLine, caps: &ServerCapabilities) -> bool {
        !ChannelModeChange::accepts(line, caps)
    }

    fn decode(line: &RawLine) -> Self {
        UserModeChange {
            nick: line.arg(0).to_owned(),
            changes: mode::decode(line.arg(1), line.args_from(2)),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("nick", &self.nick)?;
        encode_mode(&self.nick, &self.changes)
    }
}

fn encode_mode<T: mode::ModeType>(
    target: &str,
    changes: &[ModeChange<T>],
) -> Result<Vec<String>, MessageError> {
    mode::check_params(changes)?;
    let mut params = vec![target.to_owned()];
    if !changes.is_empty() {
        params.push(mode::encode(changes));
        params.extend(mode::encode_params(changes));
    }
    Ok(params)
}
