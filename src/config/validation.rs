//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::contacts::is_valid_nickname;
use slirc_proto::IrcCodec;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.host is required")]
    MissingHost,
    #[error("server.nick is required")]
    MissingNick,
    #[error("server.nick is not a valid nickname: '{0}'")]
    InvalidNick(String),
    #[error("server.encoding is not a known encoding: '{0}'")]
    UnknownEncoding(String),
    #[error("presence.poll_interval_secs must be greater than zero")]
    ZeroPollInterval,
    #[error("presence.contacts entry is not a valid nickname: '{0}'")]
    InvalidContact(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Required fields
    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.server.nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    } else if !is_valid_nickname(&config.server.nick) {
        errors.push(ValidationError::InvalidNick(config.server.nick.clone()));
    }

    if IrcCodec::new().with_encoding(&config.server.encoding).is_err() {
        errors.push(ValidationError::UnknownEncoding(config.server.encoding.clone()));
    }

    if config.presence.poll_interval_secs == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    for contact in &config.presence.contacts {
        if !is_valid_nickname(contact) {
            errors.push(ValidationError::InvalidContact(contact.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid_config() -> String {
        r#"
[server]
host = "irc.example.net"
nick = "watcher"

[presence]
contacts = ["alice", "bob[away]"]
"#
        .to_string()
    }

    #[test]
    fn test_valid_config_passes() {
        let config: Config = toml::from_str(&minimal_valid_config()).unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_host_fails() {
        let toml = r#"
[server]
host = "  "
nick = "watcher"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingHost)));
    }

    #[test]
    fn test_bad_nick_fails() {
        let toml = r##"
[server]
host = "irc.example.net"
nick = "#channel"
"##;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidNick(_))));
    }

    #[test]
    fn test_zero_poll_interval_fails() {
        let toml = r#"
[server]
host = "irc.example.net"
nick = "watcher"

[presence]
poll_interval_secs = 0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroPollInterval)));
    }

    #[test]
    fn test_unknown_encoding_fails() {
        let toml = r#"
[server]
host = "irc.example.net"
nick = "watcher"
encoding = "ebcdic-ish"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::UnknownEncoding(label)] if label == "ebcdic-ish"
        ));
    }

    #[test]
    fn test_latin1_encoding_passes() {
        let toml = r#"
[server]
host = "irc.example.net"
nick = "watcher"
encoding = "latin1"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_each_bad_contact_reported() {
        let toml = r#"
[server]
host = "irc.example.net"
nick = "watcher"

[presence]
contacts = ["alice", "two words", "a,b"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, ValidationError::InvalidContact(_))));
    }
}
