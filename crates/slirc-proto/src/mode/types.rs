//! User and channel mode symbol tables.
//!
//! # Reference
//! - RFC 2812 Section 3.1.5 (User Modes)
//! - RFC 2812 Section 3.2.3 (Channel Modes)
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

use std::fmt;

/// Direction of a mode change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModeAction {
    /// `+`
    Add,
    /// `-`
    Remove,
}

impl ModeAction {
    /// Wire sign for this action.
    pub fn sign(self) -> char {
        match self {
            ModeAction::Add => '+',
            ModeAction::Remove => '-',
        }
    }
}

/// A mode symbol table.
///
/// Implemented by [`UserMode`] and [`ChannelMode`]. `from_char` and
/// `to_char` must be inverse; unrecognised characters map to an `Unknown`
/// variant so no symbol is lost.
pub trait ModeType: fmt::Debug + Clone + PartialEq {
    /// Parse a mode character into its typed representation.
    fn from_char(c: char) -> Self;

    /// The wire character for this symbol.
    fn to_char(&self) -> char;

    /// Returns true if this symbol consumes a parameter for `action`.
    fn takes_arg(&self, action: ModeAction) -> bool;

    /// Returns true if this symbol may leave out the parameter it takes.
    ///
    /// List modes are queried that way (`MODE #channel +b`).
    fn param_optional(&self) -> bool {
        false
    }
}

/// User modes as defined in RFC 2812 and common extensions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum UserMode {
    /// 'a' - User is away
    Away,
    /// 'i' - Invisible
    Invisible,
    /// 'w' - Receives WALLOPS
    Wallops,
    /// 'r' - Identified with services
    Registered,
    /// 'R' - Only registered users can message
    RegisteredOnly,
    /// 'B' - Bot
    Bot,
    /// 'o' - IRC operator
    Oper,
    /// 'O' - Local operator
    LocalOper,
    /// 's' - Server notices, with an optional snomask when set
    ServerNotices,
    /// 'x' - Cloaked hostname
    MaskedHost,
    /// 'd' - Deaf
    Deaf,
    /// 'g' - CallerID
    CallerId,
    /// Unknown mode character
    Unknown(char),
}

impl ModeType for UserMode {
    fn from_char(c: char) -> Self {
        match c {
            'a' => Self::Away,
            'i' => Self::Invisible,
            'w' => Self::Wallops,
            'r' => Self::Registered,
            'R' => Self::RegisteredOnly,
            'B' => Self::Bot,
            'o' => Self::Oper,
            'O' => Self::LocalOper,
            's' => Self::ServerNotices,
            'x' => Self::MaskedHost,
            'd' => Self::Deaf,
            'g' => Self::CallerId,
            _ => Self::Unknown(c),
        }
    }

    fn to_char(&self) -> char {
        match self {
            Self::Away => 'a',
            Self::Invisible => 'i',
            Self::Wallops => 'w',
            Self::Registered => 'r',
            Self::RegisteredOnly => 'R',
            Self::Bot => 'B',
            Self::Oper => 'o',
            Self::LocalOper => 'O',
            Self::ServerNotices => 's',
            Self::MaskedHost => 'x',
            Self::Deaf => 'd',
            Self::CallerId => 'g',
            Self::Unknown(c) => *c,
        }
    }

    fn takes_arg(&self, action: ModeAction) -> bool {
        matches!(self, Self::ServerNotices) && action == ModeAction::Add
    }

    fn param_optional(&self) -> bool {
        matches!(self, Self::ServerNotices)
    }
}

/// Channel modes as defined in RFC 2812 and common extensions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ChannelMode {
    // === List modes ===
    /// 'b' - Ban mask
    Ban,
    /// 'e' - Ban exception mask
    Exception,
    /// 'I' - Invite exception mask
    InviteException,
    /// 'q' - Quiet mask
    Quiet,

    // === Parameter modes ===
    /// 'k' - Channel key (parameter on both add and remove)
    Key,
    /// 'l' - User limit (parameter only when set)
    Limit,
    /// 'f' - Flood protection (parameter only when set)
    Flood,
    /// 'L' - Overflow redirect (parameter only when set)
    Redirect,

    // === Flags ===
    /// 'i' - Invite only
    InviteOnly,
    /// 'm' - Moderated
    Moderated,
    /// 'n' - No external messages
    NoExternalMessages,
    /// 'p' - Private
    Private,
    /// 'r' - Registered users only
    RegisteredOnly,
    /// 's' - Secret
    Secret,
    /// 't' - Only ops change the topic
    ProtectedTopic,
    /// 'c' - Block colour codes
    NoColors,
    /// 'C' - No CTCP
    NoCTCP,
    /// 'K' - No KNOCK
    NoKnock,
    /// 'z' - TLS only
    TlsOnly,

    // === Membership prefix modes ===
    /// 'a' - Channel admin
    Admin,
    /// 'o' - Channel operator
    Oper,
    /// 'h' - Half-operator
    Halfop,
    /// 'v' - Voice
    Voice,

    /// Unknown mode character
    Unknown(char),
}

impl ModeType for ChannelMode {
    fn from_char(c: char) -> Self {
        match c {
            'b' => Self::Ban,
            'e' => Self::Exception,
            'I' => Self::InviteException,
            'q' => Self::Quiet,
            'k' => Self::Key,
            'l' => Self::Limit,
            'f' => Self::Flood,
            'L' => Self::Redirect,
            'i' => Self::InviteOnly,
            'm' => Self::Moderated,
            'n' => Self::NoExternalMessages,
            'p' => Self::Private,
            'r' => Self::RegisteredOnly,
            's' => Self::Secret,
            't' => Self::ProtectedTopic,
            'c' => Self::NoColors,
            'C' => Self::NoCTCP,
            'K' => Self::NoKnock,
            'z' => Self::TlsOnly,
            'a' => Self::Admin,
            'o' => Self::Oper,
            'h' => Self::Halfop,
            'v' => Self::Voice,
            _ => Self::Unknown(c),
        }
    }

    fn to_char(&self) -> char {
        match self {
            Self::Ban => 'b',
            Self::Exception => 'e',
            Self::InviteException => 'I',
            Self::Quiet => 'q',
            Self::Key => 'k',
            Self::Limit => 'l',
            Self::Flood => 'f',
            Self::Redirect => 'L',
            Self::InviteOnly => 'i',
            Self::Moderated => 'm',
            Self::NoExternalMessages => 'n',
            Self::Private => 'p',
            Self::RegisteredOnly => 'r',
            Self::Secret => 's',
            Self::ProtectedTopic => 't',
            Self::NoColors => 'c',
            Self::NoCTCP => 'C',
            Self::NoKnock => 'K',
            Self::TlsOnly => 'z',
            Self::Admin => 'a',
            Self::Oper => 'o',
            Self::Halfop => 'h',
            Self::Voice => 'v',
            Self::Unknown(c) => *c,
        }
    }

    fn takes_arg(&self, action: ModeAction) -> bool {
        match self {
            Self::Ban
            | Self::Exception
            | Self::InviteException
            | Self::Quiet
            | Self::Key
            | Self::Admin
            | Self::Oper
            | Self::Halfop
            | Self::Voice => true,
            Self::Limit | Self::Flood | Self::Redirect => action == ModeAction::Add,
            _ => false,
        }
    }

    fn param_optional(&self) -> bool {
        matches!(
            self,
            Self::Ban | Self::Exception | Self::InviteException | Self::Quiet
        )
    }
}

/// One change in a mode string: action, symbol and optional parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeChange<T> {
    /// Add or remove.
    pub action: ModeAction,
    /// The mode symbol.
    pub symbol: T,
    /// Threaded parameter, if the symbol took one.
    pub parameter: Option<String>,
}

impl<T: ModeType> ModeChange<T> {
    /// `+symbol` without a parameter.
    pub fn add(symbol: T) -> Self {
        Self {
            action: ModeAction::Add,
            symbol,
            parameter: None,
        }
    }

    /// `-symbol` without a parameter.
    pub fn remove(symbol: T) -> Self {
        Self {
            action: ModeAction::Remove,
            symbol,
            parameter: None,
        }
    }

    /// Attach a parameter.
    pub fn with_param(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    /// Flag text such as `+o`.
    pub fn flag(&self) -> String {
        format!("{}{}", self.action.sign(), self.symbol.to_char())
    }
}

impl<T: ModeType> fmt::Display for ModeChange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag())?;
        if let Some(p) = &self.parameter {
            write!(f, " {}", p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_mode_chars() {
        assert_eq!(UserMode::from_char('i'), UserMode::Invisible);
        assert_eq!(UserMode::from_char('z'), UserMode::Unknown('z'));
        assert_eq!(UserMode::Unknown('z').to_char(), 'z');
    }

    #[test]
    fn test_channel_mode_table_is_bijective() {
        for c in ('a'..='z').chain('A'..='Z') {
            assert_eq!(ChannelMode::from_char(c).to_char(), c);
            assert_eq!(UserMode::from_char(c).to_char(), c);
        }
    }

    #[test]
    fn test_channel_mode_takes_arg() {
        assert!(ChannelMode::Ban.takes_arg(ModeAction::Remove));
        assert!(ChannelMode::Oper.takes_arg(ModeAction::Add));
        assert!(ChannelMode::Key.takes_arg(ModeAction::Remove));
        assert!(ChannelMode::Limit.takes_arg(ModeAction::Add));
        assert!(!ChannelMode::Limit.takes_arg(ModeAction::Remove));
        assert!(!ChannelMode::Secret.takes_arg(ModeAction::Add));
        assert!(!ChannelMode::Unknown('Y').takes_arg(ModeAction::Add));
    }

    #[test]
    fn test_mode_change_display() {
        let change = ModeChange::add(ChannelMode::Oper).with_param("nick");
        assert_eq!(change.flag(), "+o");
        assert_eq!(format!("{}", change), "+o nick");
        assert_eq!(format!("{}", ModeChange::remove(UserMode::Invisible)), "-i");
    }
}
