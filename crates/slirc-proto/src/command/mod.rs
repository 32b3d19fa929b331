//! Typed message shapes.
//!
//! [`Command`] is the closed union over every shape the catalog knows, plus
//! an [`Command::Unknown`] fallback carrying the tokenized line untouched.
//! [`CommandKind`] is its field-less tag, used to key the schema side table
//! and message subscriptions.

mod channel;
mod connection;
mod messaging;
mod numeric;
mod presence;
mod user;
pub(crate) mod util;

pub use channel::{
    ChannelModeChange, Invite, Join, Kick, Knock, List, ListFilter, Names, Part, Topic,
    UserModeChange,
};
pub use connection::{Error, Nick, Pass, Ping, Pong, Quit, User};
pub use messaging::{Notice, Privmsg, Whisper};
pub use numeric::{
    AwayReply, EndOfMonList, EndOfMotd, EndOfNames, IsonReply, Isupport, ListEnd, ListItem,
    MonList, MonListFull, MonOffline, MonOnline, NamesReply, NicknameInUse, NoMotd,
    NoSuchNick, PropEnd, PropReply, TooManyWatch, TopicReply, WatchLogoff, WatchLogon,
    WatchNowOff, WatchNowOn, WatchStopped, WatchedUser, Welcome,
};
pub use presence::{
    MonitorAdd, MonitorClear, MonitorList, MonitorRemove, MonitorStatus, WatchClear, WatchEdit,
    WatchList, WatchStatus,
};
pub use user::{Away, Ison, Prop, Who, Whois};

use crate::message::RawLine;

/// Links a shape struct to its [`Command`] variant.
pub trait Variant: Sized {
    /// Tag of the variant wrapping this shape.
    const KIND: CommandKind;

    /// Borrow the shape out of `command` if it is this variant.
    fn peel(command: &Command) -> Option<&Self>;
}

macro_rules! commands {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident($ty:ty)
        ),* $(,)?
    ) => {
        /// A decoded message body.
        #[derive(Clone, Debug, PartialEq, Eq)]
        #[non_exhaustive]
        pub enum Command {
            $(
                $(#[$meta])*
                $variant($ty),
            )*
            /// A line no schema accepted.
            Unknown(RawLine),
        }

        /// Field-less tag of a [`Command`] variant.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[non_exhaustive]
        pub enum CommandKind {
            $(
                $(#[$meta])*
                $variant,
            )*
            /// See [`Command::Unknown`].
            Unknown,
        }

        impl Command {
            /// Tag of this variant.
            pub fn kind(&self) -> CommandKind {
                match self {
                    $( Command::$variant(_) => CommandKind::$variant, )*
                    Command::Unknown(_) => CommandKind::Unknown,
                }
            }
        }

        $(
            impl From<$ty> for Command {
                fn from(shape: $ty) -> Self {
                    Command::$variant(shape)
                }
            }

            impl Variant for $ty {
                const KIND: CommandKind = CommandKind::$variant;

                fn peel(command: &Command) -> Option<&Self> {
                    match command {
                        Command::$variant(shape) => Some(shape),
                        _ => None,
                    }
                }
            }
        )*
    };
}

commands! {
    /// `PASS`
    Pass(Pass),
    /// `NICK`
    Nick(Nick),
    /// `USER`
    User(User),
    /// `QUIT`
    Quit(Quit),
    /// `PING`
    Ping(Ping),
    /// `PONG`
    Pong(Pong),
    /// `ERROR`
    Error(Error),

    /// `JOIN`
    Join(Join),
    /// `PART`
    Part(Part),
    /// `TOPIC`
    Topic(Topic),
    /// `KICK`
    Kick(Kick),
    /// `INVITE`
    Invite(Invite),
    /// `KNOCK`
    Knock(Knock),
    /// `NAMES`
    Names(Names),
    /// `LIST` with extended filters
    ListFilter(ListFilter),
    /// `LIST` by channel name
    List(List),
    /// `MODE` on a channel
    ChannelMode(ChannelModeChange),
    /// `MODE` on a user
    UserMode(UserModeChange),

    /// `PRIVMSG`
    Privmsg(Privmsg),
    /// `NOTICE`
    Notice(Notice),
    /// `WHISPER`
    Whisper(Whisper),

    /// `AWAY`
    Away(Away),
    /// `WHO`
    Who(Who),
    /// `WHOIS`
    Whois(Whois),
    /// `ISON`
    Ison(Ison),
    /// `PROP`
    Prop(Prop),

    /// `WATCH +nick -nick`
    WatchEdit(WatchEdit),
    /// `WATCH C`
    WatchClear(WatchClear),
    /// `WATCH S`
    WatchStatus(WatchStatus),
    /// `WATCH L` / `WATCH l`
    WatchList(WatchList),
    /// `MONITOR +`
    MonitorAdd(MonitorAdd),
    /// `MONITOR -`
    MonitorRemove(MonitorRemove),
    /// `MONITOR C`
    MonitorClear(MonitorClear),
    /// `MONITOR L`
    MonitorList(MonitorList),
    /// `MONITOR S`
    MonitorStatus(MonitorStatus),

    /// `001 RPL_WELCOME`
    Welcome(Welcome),
    /// `005 RPL_ISUPPORT`
    Isupport(Isupport),
    /// `301 RPL_AWAY`
    AwayReply(AwayReply),
    /// `303 RPL_ISON`
    IsonReply(IsonReply),
    /// `322 RPL_LIST`
    ListItem(ListItem),
    /// `323 RPL_LISTEND`
    ListEnd(ListEnd),
    /// `332 RPL_TOPIC`
    TopicReply(TopicReply),
    /// `353 RPL_NAMREPLY`
    NamesReply(NamesReply),
    /// `366 RPL_ENDOFNAMES`
    EndOfNames(EndOfNames),
    /// `376 RPL_ENDOFMOTD`
    EndOfMotd(EndOfMotd),
    /// `401 ERR_NOSUCHNICK`
    NoSuchNick(NoSuchNick),
    /// `422 ERR_NOMOTD`
    NoMotd(NoMotd),
    /// `433 ERR_NICKNAMEINUSE`
    NicknameInUse(NicknameInUse),
    /// `512 ERR_TOOMANYWATCH`
    TooManyWatch(TooManyWatch),
    /// `600 RPL_LOGON`
    WatchLogon(WatchLogon),
    /// `601 RPL_LOGOFF`
    WatchLogoff(WatchLogoff),
    /// `602 RPL_WATCHOFF`
    WatchStopped(WatchStopped),
    /// `604 RPL_NOWON`
    WatchNowOn(WatchNowOn),
    /// `605 RPL_NOWOFF`
    WatchNowOff(WatchNowOff),
    /// `730 RPL_MONONLINE`
    MonOnline(MonOnline),
    /// `731 RPL_MONOFFLINE`
    MonOffline(MonOffline),
    /// `732 RPL_MONLIST`
    MonList(MonList),
    /// `733 RPL_ENDOFMONLIST`
    EndOfMonList(EndOfMonList),
    /// `734 ERR_MONLISTFULL`
    MonListFull(MonListFull),
    /// `818 RPL_PROPLIST`
    PropReply(PropReply),
    /// `819 RPL_PROPEND`
    PropEnd(PropEnd),
}

impl From<RawLine> for Command {
    fn from(line: RawLine) -> Self {
        Command::Unknown(line)
    }
}
