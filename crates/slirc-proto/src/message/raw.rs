//! The tokenized form of one protocol line.

/// Maximum number of parameters a single line carries (RFC 2812).
pub const MAX_PARAMS: usize = 15;

/// One raw protocol line split into source prefix, command token and
/// parameters.
///
/// Produced by [`tokenize`](super::tokenize) and never mutated afterwards.
/// The default value is the sentinel for an undecodable line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawLine {
    prefix: Option<String>,
    command: String,
    params: Vec<String>,
}

impl RawLine {
    /// Build a line from its parts.
    pub fn new<P, I, S>(prefix: Option<P>, command: impl Into<String>, params: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: prefix.map(Into::into).filter(|p: &String| !p.is_empty()),
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Source prefix without the leading `:`, if one was present.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Command word or three-digit numeric, as received.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// All parameters, trailing parameter included.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Parameter `index`, or the empty string when absent.
    pub fn arg(&self, index: usize) -> &str {
        self.params.get(index).map(String::as_str).unwrap_or("")
    }

    /// Parameters from `index` onwards.
    pub fn args_from(&self, index: usize) -> &[String] {
        self.params.get(index..).unwrap_or(&[])
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True for the sentinel produced by malformed input.
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }

    /// True if the command is a three-digit numeric reply.
    pub fn is_numeric(&self) -> bool {
        self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit())
    }

    /// Leading character of the first parameter.
    pub fn first_sigil(&self) -> Option<char> {
        self.params.first().and_then(|p| p.chars().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_default_absent_params() {
        let line = RawLine::new(Some("srv"), "303", ["me", "alice bob"]);
        assert_eq!(line.prefix(), Some("srv"));
        assert_eq!(line.arg(1), "alice bob");
        assert_eq!(line.arg(7), "");
        assert!(line.args_from(5).is_empty());
        assert!(line.is_numeric());
        assert_eq!(line.first_sigil(), Some('m'));
    }

    #[test]
    fn test_empty_prefix_is_none() {
        let line = RawLine::new(Some(""), "PING", ["x"]);
        assert_eq!(line.prefix(), None);
        assert!(!line.is_empty());
        assert!(RawLine::default().is_empty());
    }
}
