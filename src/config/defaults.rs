//! Default value functions for configuration.

pub fn default_port() -> u16 {
    6667
}

pub fn default_realname() -> String {
    "slirc-presence".to_string()
}

pub fn default_encoding() -> String {
    "utf-8".to_string()
}

// =============================================================================
// Presence Defaults
// =============================================================================

pub fn default_poll_interval() -> u64 {
    30
}

pub fn default_max_skipped_polls() -> u32 {
    3
}
