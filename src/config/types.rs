//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::{
    default_encoding, default_max_skipped_polls, default_poll_interval, default_port,
    default_realname,
};
use super::validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server to connect to and the identity to register with.
    pub server: ServerConfig,
    /// Contact tracking.
    #[serde(default)]
    pub presence: PresenceConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Server connection and registration settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname or IP address (e.g., "irc.libera.chat").
    pub host: String,
    /// Plaintext port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Nickname to register with.
    pub nick: String,
    /// Username (ident). Falls back to the nickname.
    #[serde(default)]
    pub user: Option<String>,
    /// Real name sent in USER.
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Connection password sent with PASS (optional).
    pub password: Option<String>,
    /// Character encoding of the connection, as a WHATWG label
    /// (default: "utf-8"). Undecodable bytes become U+FFFD.
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl ServerConfig {
    /// `host:port` for [`tokio::net::TcpStream::connect`].
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Username to register with.
    pub fn username(&self) -> &str {
        self.user.as_deref().unwrap_or(&self.nick)
    }
}

/// Contact tracking settings.
///
/// The tracking protocol is picked from what the server advertises:
/// WATCH, then MONITOR, then ISON polling.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    /// Seconds between ISON polls when the server offers neither WATCH nor
    /// MONITOR (default: 30).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Ticks to wait on an unanswered poll before abandoning it (default: 3).
    #[serde(default = "default_max_skipped_polls")]
    pub max_skipped_polls: u32,
    /// Nicknames to track from startup.
    #[serde(default)]
    pub contacts: Vec<String>,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            max_skipped_polls: default_max_skipped_polls(),
            contacts: Vec::new(),
        }
    }
}

impl PresenceConfig {
    /// Poll period as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
