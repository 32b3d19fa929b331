//! Text delivery shapes.

use crate::error::MessageError;
use crate::message::RawLine;
use crate::schema::Shape;

use super::util::{join_list, require, require_list, split_list};

/// `PRIVMSG <target> :<text>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Privmsg {
    /// Nickname or channel.
    pub target: String,
    /// Message body.
    pub text: String,
}

impl Shape for Privmsg {
    const TOKEN: &'static str = "PRIVMSG";

    fn decode(line: &RawLine) -> Self {
        Privmsg {
            target: line.arg(0).to_owned(),
            text: line.arg(1).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("target", &self.target)?;
        Ok(vec![self.target.clone(), self.text.clone()])
    }
}

/// `NOTICE <target> :<text>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Nickname or channel.
    pub target: String,
    /// Message body.
    pub text: String,
}

impl Shape for Notice {
    const TOKEN: &'static str = "NOTICE";

    fn decode(line: &RawLine) -> Self {
        Notice {
            target: line.arg(0).to_owned(),
            text: line.arg(1).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("target", &self.target)?;
        Ok(vec![self.target.clone(), self.text.clone()])
    }
}

/// `WHISPER <channel> <nick>{,<nick>} :<text>`
///
/// A private message to channel members, scoped to a channel both sides
/// share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Whisper {
    /// Shared channel.
    pub channel: String,
    /// Recipients.
    pub targets: Vec<String>,
    /// Message body.
    pub text: String,
}

impl Shape for Whisper {
    const TOKEN: &'static str = "WHISPER";

    fn decode(line: &RawLine) -> Self {
        Whisper {
            channel: line.arg(0).to_owned(),
            targets: split_list(line.arg(1)),
            text: line.arg(2).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("channel", &self.channel)?;
        require_list("targets", &self.targets)?;
        Ok(vec![
            self.channel.clone(),
            join_list(&self.targets)?,
            self.text.clone(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::tokenize;

    #[test]
    fn test_whisper_decode() {
        let whisper = Whisper::decode(&tokenize("WHISPER #room alice,bob :psst over here"));
        assert_eq!(whisper.channel, "#room");
        assert_eq!(whisper.targets, vec!["alice", "bob"]);
        assert_eq!(whisper.text, "psst over here");
    }

    #[test]
    fn test_whisper_requires_channel_and_targets() {
        let mut whisper = Whisper {
            channel: String::new(),
            targets: vec!["alice".into()],
            text: "hi".into(),
        };
        assert_eq!(whisper.encode(), Err(MessageError::MissingField("channel")));
        whisper.channel = "#room".into();
        whisper.targets.clear();
        assert_eq!(whisper.encode(), Err(MessageError::MissingField("targets")));
    }

    #[test]
    fn test_privmsg_absent_text_defaults_empty() {
        let msg = Privmsg::decode(&tokenize("PRIVMSG alice"));
        assert_eq!(msg.text, "");
    }
}
