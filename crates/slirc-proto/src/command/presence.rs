//! Presence subscription shapes: `WATCH` and `MONITOR`.
//!
//! Several shapes share each command token. Catalog order for `WATCH` is
//! edit, clear, status, list; the `MONITOR` shapes are disjoint on the
//! first parameter.
//!
//! # Reference
//! - <https://ircv3.net/specs/extensions/monitor>

use crate::error::MessageError;
use crate::isupport::ServerCapabilities;
use crate::message::RawLine;
use crate::schema::Shape;

use super::util::{join_list, require_list, split_list};

fn first_is(line: &RawLine, word: &str) -> bool {
    line.arg(0).eq_ignore_ascii_case(word)
}

/// `WATCH +nick -nick ...`
///
/// Tokens may be separated by spaces or commas and spread over several
/// parameters; a token without a sign inherits the previous one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchEdit {
    /// Nicknames to start watching.
    pub added: Vec<String>,
    /// Nicknames to stop watching.
    pub removed: Vec<String>,
}

impl Shape for WatchEdit {
    const TOKEN: &'static str = "WATCH";

    fn accepts(line: &RawLine, _caps: &ServerCapabilities) -> bool {
        matches!(line.first_sigil(), Some('+' | '-'))
    }

    fn decode(line: &RawLine) -> Self {
        let mut edit = WatchEdit::default();
        let mut adding = true;

        let tokens = line
            .params()
            .iter()
            .flat_map(|p| p.split(|c| c == ',' || c == ' '));
        for token in tokens {
            let nick = if let Some(nick) = token.strip_prefix('+') {
                adding = true;
                nick
            } else if let Some(nick) = token.strip_prefix('-') {
                adding = false;
                nick
            } else {
                token
            };
            if nick.is_empty() {
                continue;
            }
            if adding {
                edit.added.push(nick.to_owned());
            } else {
                edit.removed.push(nick.to_owned());
            }
        }

        edit
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        if self.added.is_empty() && self.removed.is_empty() {
            return Err(MessageError::MissingField("nicks"));
        }
        let mut tokens = Vec::with_capacity(self.added.len() + self.removed.len());
        for (sign, nicks) in [('+', &self.added), ('-', &self.removed)] {
            for nick in nicks {
                if nick.is_empty() || nick.contains([' ', ',']) {
                    return Err(MessageError::IllegalParameter(nick.clone()));
                }
                tokens.push(format!("{}{}", sign, nick));
            }
        }
        Ok(vec![tokens.join(" ")])
    }
}

/// `WATCH C`: clear the watch list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchClear;

impl Shape for WatchClear {
    const TOKEN: &'static str = "WATCH";

    fn accepts(line: &RawLine, _caps: &ServerCapabilities) -> bool {
        first_is(line, "C")
    }

    fn decode(_: &RawLine) -> Self {
        WatchClear
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        Ok(vec!["C".to_owned()])
    }
}

/// `WATCH S`: watch list status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchStatus;

impl Shape for WatchStatus {
    const TOKEN: &'static str = "WATCH";

    fn accepts(line: &RawLine, _caps: &ServerCapabilities) -> bool {
        first_is(line, "S")
    }

    fn decode(_: &RawLine) -> Self {
        WatchStatus
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        Ok(vec!["S".to_owned()])
    }
}

/// `WATCH`, `WATCH L` or `WATCH l`: list watched users.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchList {
    /// `l`: only list watched users who are online.
    pub online_only: bool,
}

impl Shape for WatchList {
    const TOKEN: &'static str = "WATCH";

    fn accepts(line: &RawLine, _caps: &ServerCapabilities) -> bool {
        matches!(line.arg(0), "" | "L" | "l")
    }

    fn decode(line: &RawLine) -> Self {
        WatchList {
            online_only: line.arg(0) == "l",
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        let flag = if self.online_only { "l" } else { "L" };
        Ok(vec![flag.to_owned()])
    }
}

/// Nicknames after a `MONITOR` sign: `MONITOR + a,b` or `MONITOR +a,b`.
fn monitor_targets(line: &RawLine) -> Vec<String> {
    let first = line.arg(0);
    if first.len() == 1 {
        split_list(line.arg(1))
    } else {
        split_list(&first[1..])
    }
}

fn encode_monitor(sign: &str, nicks: &[String]) -> Result<Vec<String>, MessageError> {
    require_list("nicks", nicks)?;
    Ok(vec![sign.to_owned(), join_list(nicks)?])
}

/// `MONITOR + <nick>{,<nick>}`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonitorAdd {
    /// Nicknames to add.
    pub nicks: Vec<String>,
}

impl Shape for MonitorAdd {
    const TOKEN: &'static str = "MONITOR";

    fn accepts(line: &RawLine, _caps: &ServerCapabilities) -> bool {
        line.first_sigil() == Some('+')
    }

    fn decode(line: &RawLine) -> Self {
        MonitorAdd {
            nicks: monitor_targets(line),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        encode_monitor("+", &self.nicks)
    }
}

/// `MONITOR - <nick>{,<nick>}`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonitorRemove {
    /// Nicknames to remove.
    pub nicks: Vec<String>,
}

impl Shape for MonitorRemove {
    const TOKEN: &'static str = "MONITOR";

    fn accepts(line: &RawLine, _caps: &ServerCapabilities) -> bool {
        line.first_sigil() == Some('-')
    }

    fn decode(line: &RawLine) -> Self {
        MonitorRemove {
            nicks: monitor_targets(line),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        encode_monitor("-", &self.nicks)
    }
}

macro_rules! monitor_query {
    ($(#[$meta:meta])* $name:ident, $word:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl Shape for $name {
            const TOKEN: &'static str = "MONITOR";

            fn accepts(line: &RawLine, _caps: &ServerCapabilities) -> bool {
                first_is(line, $word)
            }

            fn decode(_: &RawLine) -> Self {
                $name
            }

            fn encode(&self) -> Result<Vec<String>, MessageError> {
                Ok(vec![$word.to_owned()])
            }
        }
    };
}

monitor_query!(
    /// `MONITOR C`: clear the monitor list.
    MonitorClear,
    "C"
);
monitor_query!(
    /// `MONITOR L`: list monitored nicknames.
    MonitorList,
    "L"
);
monitor_query!(
    /// `MONITOR S`: report status of every monitored nickname.
    MonitorStatus,
    "S"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::tokenize;

    #[test]
    fn test_watch_edit_signs() {
        let line = tokenize("WATCH +alice bob -carol,dave +erin");
        assert!(WatchEdit::accepts(&line, &ServerCapabilities::new()));
        let edit = WatchEdit::decode(&line);
        assert_eq!(edit.added, vec!["alice", "bob", "erin"]);
        assert_eq!(edit.removed, vec!["carol", "dave"]);
    }

    #[test]
    fn test_watch_edit_comma_form() {
        let edit = WatchEdit::decode(&tokenize("WATCH +x,y"));
        assert_eq!(edit.added, vec!["x", "y"]);
        assert_eq!(edit.encode().unwrap(), vec!["+x +y"]);
    }

    #[test]
    fn test_watch_queries_do_not_accept_edits() {
        let line = tokenize("WATCH L");
        assert!(!WatchEdit::accepts(&line, &ServerCapabilities::new()));
        assert!(WatchList::accepts(&line, &ServerCapabilities::new()));
        assert!(!WatchList::decode(&line).online_only);
        assert!(WatchList::decode(&tokenize("WATCH l")).online_only);
        assert!(WatchList::accepts(&tokenize("WATCH"), &ServerCapabilities::new()));
        assert!(WatchClear::accepts(&tokenize("WATCH c"), &ServerCapabilities::new()));
    }

    #[test]
    fn test_monitor_targets_both_forms() {
        let a = MonitorAdd::decode(&tokenize("MONITOR + alice,bob"));
        let b = MonitorAdd::decode(&tokenize("MONITOR +alice,bob"));
        assert_eq!(a, b);
        assert_eq!(a.encode().unwrap(), vec!["+", "alice,bob"]);
        let r = MonitorRemove::decode(&tokenize("MONITOR - carol"));
        assert_eq!(r.nicks, vec!["carol"]);
    }

    #[test]
    fn test_monitor_add_requires_nicks() {
        assert_eq!(
            MonitorAdd::default().encode(),
            Err(MessageError::MissingField("nicks"))
        );
    }
}
