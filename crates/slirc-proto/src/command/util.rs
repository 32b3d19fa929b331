//! Shared helpers for shape decode and encode.

use std::str::FromStr;

use crate::error::MessageError;

/// Fail with [`MessageError::MissingField`] when `value` is empty.
pub fn require(field: &'static str, value: &str) -> Result<(), MessageError> {
    if value.is_empty() {
        Err(MessageError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Fail with [`MessageError::MissingField`] when `items` is empty or holds
/// an empty entry.
pub fn require_list(field: &'static str, items: &[String]) -> Result<(), MessageError> {
    if items.is_empty() || items.iter().any(String::is_empty) {
        Err(MessageError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Split a comma-separated list, dropping empty entries.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join a list for a comma-separated parameter.
///
/// Entries holding a comma or a space cannot be represented.
pub fn join_list(items: &[String]) -> Result<String, MessageError> {
    if let Some(bad) = items.iter().find(|i| i.contains(',') || i.contains(' ')) {
        return Err(MessageError::IllegalParameter(bad.clone()));
    }
    Ok(items.join(","))
}

/// Split a space-separated list, as used by `ISON` and `RPL_NAMREPLY`.
pub fn split_words(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_owned).collect()
}

/// Join a list into a single space-separated parameter.
pub fn join_words(items: &[String]) -> Result<String, MessageError> {
    if let Some(bad) = items.iter().find(|i| i.is_empty() || i.contains(' ')) {
        return Err(MessageError::IllegalParameter(bad.clone()));
    }
    Ok(items.join(" "))
}

/// Parse a count leniently: malformed or absent input yields the default.
pub fn parse_count<T: FromStr + Default>(s: &str) -> T {
    s.trim().parse().unwrap_or_default()
}

/// Owned copy of an optional trailing parameter; absent becomes empty.
pub fn arg_string(params: &[String], index: usize) -> String {
    params.get(index).cloned().unwrap_or_default()
}

/// Push `value` only when non-empty.
pub fn push_opt(params: &mut Vec<String>, value: &str) {
    if !value.is_empty() {
        params.push(value.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_join_lists() {
        assert_eq!(split_list("a,,b,"), vec!["a", "b"]);
        assert_eq!(join_list(&["a".into(), "b".into()]).unwrap(), "a,b");
        assert!(join_list(&["a,b".into()]).is_err());
        assert_eq!(split_words("  a  b "), vec!["a", "b"]);
        assert!(join_words(&["a b".into()]).is_err());
    }

    #[test]
    fn test_parse_count_is_lenient() {
        assert_eq!(parse_count::<u32>("42"), 42);
        assert_eq!(parse_count::<u32>("-3"), 0);
        assert_eq!(parse_count::<i64>("junk"), 0);
        assert_eq!(parse_count::<u32>(""), 0);
    }

    #[test]
    fn test_require() {
        assert_eq!(require("channel", ""), Err(MessageError::MissingField("channel")));
        assert!(require("channel", "#a").is_ok());
        assert!(require_list("targets", &[]).is_err());
        assert!(require_list("targets", &["".into()]).is_err());
    }
}
