//! Channel name utilities.
//!
//! # Reference
//! - RFC 2812 Section 1.3: Channel names

/// Channel type prefixes recognised when the server does not say otherwise.
pub const DEFAULT_CHANTYPES: &str = "#&+!";

/// True if `name` is a channel name under the `chantypes` prefix set.
///
/// Valid channel names start with one of `chantypes`, are at most 50
/// characters long and contain no space, comma, BEL or control characters.
pub fn is_channel_name_with(name: &str, chantypes: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if !chantypes.contains(first) || name.chars().count() > 50 {
        return false;
    }

    !name
        .chars()
        .skip(1)
        .any(|c| c == ' ' || c == ',' || c == '\x07' || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_channel(name: &str) -> bool {
        is_channel_name_with(name, DEFAULT_CHANTYPES)
    }

    #[test]
    fn test_valid_channels() {
        assert!(is_channel("#channel"));
        assert!(is_channel("&local"));
        assert!(is_channel("+modeless"));
        assert!(is_channel("!safe12345"));
    }

    #[test]
    fn test_invalid_channels() {
        assert!(!is_channel("channel")); // no prefix
        assert!(!is_channel("#chan nel"));
        assert!(!is_channel("#chan,nel"));
        assert!(!is_channel(""));
        assert!(!is_channel(&format!("#{}", "x".repeat(50))));
    }

    #[test]
    fn test_custom_chantypes() {
        assert!(is_channel_name_with("#rust", "#"));
        assert!(!is_channel_name_with("&local", "#"));
        assert!(!is_channel_name_with("#rust", ""));
    }
}
