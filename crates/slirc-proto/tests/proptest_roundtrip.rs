//! Property-based tests for the dispatcher and mode codec.
//!
//! Generates legal field values for a range of shapes and verifies that
//! encoding then decoding yields the same value, and that the mode codec is
//! idempotent over its canonical form.

use proptest::prelude::*;
use slirc_proto::command::{
    ChannelModeChange, Ison, ListFilter, MonitorAdd, PropReply, WatchEdit, WatchLogon,
    WatchedUser, Whisper,
};
use slirc_proto::{
    mode, ChannelMode, Command, Dispatcher, Message, ModeAction, ModeChange, ServerCapabilities,
    UserMode,
};

// =============================================================================
// STRATEGIES
// =============================================================================

/// Valid IRC nickname: starts with letter or special char.
fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

fn nick_list_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(nickname_strategy(), 1..8)
}

/// Valid IRC channel name
fn channel_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[#&][a-zA-Z0-9_\\-]{1,20}").expect("valid regex")
}

/// Trailing text. The tokenizer trims the whole line, so text never ends in
/// whitespace.
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(":".to_string()),
        Just(": leading colon".to_string()),
        prop::string::string_regex("[a-zA-Z0-9:;,.!?*#]([a-zA-Z0-9 :;,.!?*#]{0,60}[a-zA-Z0-9.!?])?")
            .expect("valid regex"),
    ]
}

fn mask_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9?*]{0,10}").expect("valid regex")
}

fn list_filter_strategy() -> impl Strategy<Value = ListFilter> {
    (
        (
            any::<Option<u32>>(),
            any::<Option<u32>>(),
            any::<Option<u32>>(),
            any::<Option<u32>>(),
        ),
        (
            any::<Option<u32>>(),
            any::<Option<u32>>(),
            prop::option::of(mask_strategy()),
            prop::option::of(mask_strategy()),
        ),
    )
        .prop_map(|((a, b, c, d), (e, f, m, n))| ListFilter {
            max_users: a,
            min_users: b,
            younger_than: c,
            older_than: d,
            topic_younger_than: e,
            topic_older_than: f,
            match_mask: m,
            not_match_mask: n,
        })
        .prop_filter("at least one filter", |f| *f != ListFilter::default())
}

fn channel_change_strategy() -> impl Strategy<Value = ModeChange<ChannelMode>> {
    (
        prop::bool::ANY,
        prop::sample::select(vec!['o', 'v', 'b', 'k', 'l', 'i', 'm', 'n', 's', 't', 'Y']),
        nickname_strategy(),
    )
        .prop_map(|(add, symbol, param)| {
            let action = if add { ModeAction::Add } else { ModeAction::Remove };
            let symbol = <ChannelMode as mode::ModeType>::from_char(symbol);
            let parameter = mode::ModeType::takes_arg(&symbol, action).then_some(param);
            ModeChange {
                action,
                symbol,
                parameter,
            }
        })
}

fn mode_string_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[+\\-]?([+\\-]?[aiwroOsxdgzQ]){0,12}").expect("valid regex")
}

fn roundtrip(dispatcher: &Dispatcher, command: Command) -> Command {
    let line = dispatcher
        .encode(&Message::new(command))
        .expect("legal fields encode");
    dispatcher.decode(&line).expect("line decodes").command
}

fn elist_dispatcher() -> Dispatcher {
    Dispatcher::default().with_capabilities(ServerCapabilities::new().with("ELIST", "CMNTU"))
}

// =============================================================================
// ROUNDTRIP PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn privmsg_roundtrip(target in channel_strategy(), text in text_strategy()) {
        let cmd: Command = Message::privmsg(target, text).command;
        prop_assert_eq!(roundtrip(&Dispatcher::default(), cmd.clone()), cmd);
    }

    #[test]
    fn whisper_roundtrip(
        channel in channel_strategy(),
        targets in nick_list_strategy(),
        text in text_strategy(),
    ) {
        let cmd = Command::Whisper(Whisper { channel, targets, text });
        prop_assert_eq!(roundtrip(&Dispatcher::default(), cmd.clone()), cmd);
    }

    #[test]
    fn watch_edit_roundtrip(added in nick_list_strategy(), removed in prop::collection::vec(nickname_strategy(), 0..4)) {
        let cmd = Command::WatchEdit(WatchEdit { added, removed });
        prop_assert_eq!(roundtrip(&Dispatcher::default(), cmd.clone()), cmd);
    }

    #[test]
    fn monitor_add_roundtrip(nicks in nick_list_strategy()) {
        let cmd = Command::MonitorAdd(MonitorAdd { nicks });
        prop_assert_eq!(roundtrip(&Dispatcher::default(), cmd.clone()), cmd);
    }

    #[test]
    fn ison_roundtrip(nicks in nick_list_strategy()) {
        let cmd = Command::Ison(Ison { nicks });
        prop_assert_eq!(roundtrip(&Dispatcher::default(), cmd.clone()), cmd);
    }

    #[test]
    fn list_filter_roundtrip(filter in list_filter_strategy()) {
        let cmd = Command::ListFilter(filter);
        prop_assert_eq!(roundtrip(&elist_dispatcher(), cmd.clone()), cmd);
    }

    #[test]
    fn channel_mode_roundtrip(
        channel in channel_strategy(),
        changes in prop::collection::vec(channel_change_strategy(), 0..6),
    ) {
        let cmd = Command::ChannelMode(ChannelModeChange { channel, changes });
        prop_assert_eq!(roundtrip(&Dispatcher::default(), cmd.clone()), cmd);
    }

    #[test]
    fn prop_reply_roundtrip(
        channel in channel_strategy(),
        property in prop::string::string_regex("[a-z]{0,10}").expect("valid regex"),
        value in prop::string::string_regex("[a-z]([a-z ]{0,20}[a-z])?").expect("valid regex"),
    ) {
        let value = if property.is_empty() { String::new() } else { value };
        let cmd = Command::PropReply(PropReply {
            target: "me".into(),
            channel,
            property,
            value,
        });
        prop_assert_eq!(roundtrip(&Dispatcher::default(), cmd.clone()), cmd);
    }

    #[test]
    fn watch_logon_roundtrip(nick in nickname_strategy(), since in any::<i64>(), text in text_strategy()) {
        let cmd = Command::WatchLogon(WatchLogon(WatchedUser {
            target: "me".into(),
            nick,
            user: "ident".into(),
            host: "host.example".into(),
            since,
            text,
        }));
        prop_assert_eq!(roundtrip(&Dispatcher::default(), cmd.clone()), cmd);
    }
}

// =============================================================================
// MODE CODEC PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn mode_decode_is_idempotent(s in mode_string_strategy()) {
        let first: Vec<ModeChange<UserMode>> = mode::decode(&s, &[]);
        let second: Vec<ModeChange<UserMode>> = mode::decode(&mode::encode(&first), &[]);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn mode_encoding_is_canonical(s in mode_string_strategy()) {
        let changes: Vec<ModeChange<UserMode>> = mode::decode(&s, &[]);
        let encoded = mode::encode(&changes);
        // No repeated signs and no sign without a following symbol.
        prop_assert!(!encoded.contains("++") && !encoded.contains("--"));
        prop_assert!(!encoded.ends_with('+') && !encoded.ends_with('-'));
        prop_assert_eq!(mode::encode(&mode::decode::<UserMode>(&encoded, &[])), encoded);
    }

    #[test]
    fn tokenizer_never_panics(line in "[^\r\n]{0,200}") {
        let _ = Dispatcher::default().decode(&line);
    }
}
