//! User query shapes.

use crate::error::MessageError;
use crate::message::RawLine;
use crate::schema::Shape;

use super::util::{join_list, join_words, push_opt, require, require_list, split_list, split_words};

/// `AWAY [:<message>]`; an empty message marks the user back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Away {
    /// Away message.
    pub message: String,
}

impl Shape for Away {
    const TOKEN: &'static str = "AWAY";

    fn decode(line: &RawLine) -> Self {
        Away {
            message: line.arg(0).to_owned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        let mut params = Vec::new();
        push_opt(&mut params, &self.message);
        Ok(params)
    }
}

/// `WHO [<mask> [o]]`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Who {
    /// Channel or host mask; empty for everyone visible.
    pub mask: String,
    /// Only list operators.
    pub operators_only: bool,
}

impl Shape for Who {
    const TOKEN: &'static str = "WHO";

    fn decode(line: &RawLine) -> Self {
        Who {
            mask: line.arg(0).to_owned(),
            operators_only: line.arg(1) == "o",
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        if self.operators_only {
            require("mask", &self.mask)?;
        }
        let mut params = Vec::new();
        push_opt(&mut params, &self.mask);
        if self.operators_only {
            params.push("o".to_owned());
        }
        Ok(params)
    }
}

/// `WHOIS [<server>] <nick>{,<nick>}`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Whois {
    /// Server to forward the query to; empty for the local server.
    pub server: String,
    /// Nicknames to look up.
    pub targets: Vec<String>,
}

impl Shape for Whois {
    const TOKEN: &'static str = "WHOIS";

    fn decode(line: &RawLine) -> Self {
        if line.len() >= 2 {
            Whois {
                server: line.arg(0).to_owned(),
                targets: split_list(line.arg(1)),
            }
        } else {
            Whois {
                server: String::new(),
                targets: split_list(line.arg(0)),
            }
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require_list("targets", &self.targets)?;
        let mut params = Vec::with_capacity(2);
        push_opt(&mut params, &self.server);
        params.push(join_list(&self.targets)?);
        Ok(params)
    }
}

/// `ISON :<nick> {<nick>}`
///
/// Sent as one space-separated trailing parameter; decoding also accepts
/// the nicknames spread over several parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ison {
    /// Nicknames to check.
    pub nicks: Vec<String>,
}

impl Shape for Ison {
    const TOKEN: &'static str = "ISON";

    fn decode(line: &RawLine) -> Self {
        Ison {
            nicks: line.params().iter().map(String::as_str).flat_map(split_words).collect(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require_list("nicks", &self.nicks)?;
        Ok(vec![join_words(&self.nicks)?])
    }
}

/// `PROP <target> [<property> [:<value>]]`
///
/// Without a property the whole property list is requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prop {
    /// Channel or nickname owning the property.
    pub target: String,
    /// Property name; empty to list all.
    pub property: String,
    /// New value; `None` reads the property.
    pub value: Option<String>,
}

impl Shape for Prop {
    const TOKEN: &'static str = "PROP";

    fn decode(line: &RawLine) -> Self {
        Prop {
            target: line.arg(0).to_owned(),
            property: line.arg(1).to_owned(),
            value: line.params().get(2).cloned(),
        }
    }

    fn encode(&self) -> Result<Vec<String>, MessageError> {
        require("target", &self.target)?;
        if self.value.is_some() {
            require("property", &self.property)?;
        }
        let mut params = vec![self.target.clone()];
        push_opt(&mut params, &self.property);
        params.extend(self.value.clone());
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::tokenize;

    #[test]
    fn test_ison_accepts_both_forms() {
        let a = Ison::decode(&tokenize("ISON :alice bob carol"));
        let b = Ison::decode(&tokenize("ISON alice bob carol"));
        assert_eq!(a, b);
        assert_eq!(a.encode().unwrap(), vec!["alice bob carol"]);
    }

    #[test]
    fn test_whois_with_server() {
        let whois = Whois::decode(&tokenize("WHOIS irc.example.net alice"));
        assert_eq!(whois.server, "irc.example.net");
        assert_eq!(whois.targets, vec!["alice"]);
        let whois = Whois::decode(&tokenize("WHOIS alice,bob"));
        assert_eq!(whois.server, "");
        assert_eq!(whois.targets.len(), 2);
    }

    #[test]
    fn test_prop_value_requires_property() {
        let prop = Prop {
            target: "#a".into(),
            property: String::new(),
            value: Some("x".into()),
        };
        assert_eq!(prop.encode(), Err(MessageError::MissingField("property")));
    }

    #[test]
    fn test_who_operator_flag() {
        let who = Who::decode(&tokenize("WHO #rust o"));
        assert!(who.operators_only);
        assert_eq!(who.encode().unwrap(), vec!["#rust", "o"]);
    }
}
