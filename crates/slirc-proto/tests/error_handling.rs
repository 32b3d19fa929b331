//! Integration tests for error handling scenarios
//!
//! Decoding never fails; encoding rejects messages that cannot be written
//! out legally and reports which field or feature is at fault.

use slirc_proto::command::{ChannelModeChange, Kick, ListFilter, PropReply, Whisper};
use slirc_proto::{
    ChannelMode, Command, CommandKind, Dispatcher, Message, MessageError, ModeChange,
    ProtocolError, RawLine, ServerCapabilities,
};

fn cause(err: &ProtocolError) -> &MessageError {
    err.message_error().expect("InvalidMessage")
}

#[test]
fn test_decode_never_fails() {
    let dispatcher = Dispatcher::default();
    let long_prefix = ":toolong!".repeat(100);
    let inputs = vec![
        ("", "empty message"),
        ("   \r\n", "whitespace only"),
        (":prefix", "prefix without command"),
        (long_prefix.as_str(), "extremely long prefix"),
        ("COMMAND \x01\x02\x03", "control characters in parameters"),
        ("LIST <,>,C<x", "garbage filter counts"),
        (":srv 322 me", "truncated list reply"),
        ("MODE", "mode without target"),
        ("MONITOR +", "monitor without nicks"),
    ];

    for (input, description) in inputs {
        if let Some(msg) = dispatcher.decode(input) {
            println!("{} decoded as {:?}", description, msg.kind());
        }
    }
}

#[test]
fn test_empty_channel_rejected() {
    let dispatcher = Dispatcher::default();
    let msg = Message::new(Kick {
        channel: String::new(),
        nick: "bob".into(),
        reason: String::new(),
    });

    let err = dispatcher.encode(&msg).unwrap_err();
    assert_eq!(cause(&err), &MessageError::MissingField("channel"));
    assert_eq!(err.to_string(), "invalid KICK message");
}

#[test]
fn test_whisper_needs_channel_and_target() {
    let dispatcher = Dispatcher::default();
    let whisper = Whisper {
        channel: String::new(),
        targets: vec!["alice".into()],
        text: "hi".into(),
    };
    let err = dispatcher.encode(&Message::new(whisper.clone())).unwrap_err();
    assert_eq!(cause(&err), &MessageError::MissingField("channel"));

    let ok = Whisper {
        channel: "#room".into(),
        ..whisper
    };
    assert_eq!(
        dispatcher.encode(&Message::new(ok)).unwrap(),
        "WHISPER #room alice hi"
    );
}

#[test]
fn test_error_source_chaining() {
    let dispatcher = Dispatcher::default();
    let msg = Message::new(PropReply {
        target: "me".into(),
        ..Default::default()
    });
    let err = dispatcher.encode(&msg).unwrap_err();

    let source = std::error::Error::source(&err).expect("cause attached");
    assert_eq!(source.to_string(), "required field `channel` is empty");
}

#[test]
fn test_extended_list_needs_elist() {
    let filter = ListFilter {
        younger_than: Some(30),
        ..Default::default()
    };
    let msg = Message::new(filter);

    let err = Dispatcher::default().encode(&msg).unwrap_err();
    assert_eq!(cause(&err), &MessageError::UnsupportedFeature("ELIST=C"));

    let dispatcher =
        Dispatcher::default().with_capabilities(ServerCapabilities::new().with("ELIST", "CMNTU"));
    assert_eq!(dispatcher.encode(&msg).unwrap(), "LIST C<30");
}

#[test]
fn test_misthreaded_mode_params_rejected() {
    let msg = Message::new(ChannelModeChange {
        channel: "#rust".into(),
        changes: vec![
            ModeChange::add(ChannelMode::Quiet),
            ModeChange::add(ChannelMode::Oper).with_param("alice"),
        ],
    });
    let err = Dispatcher::default().encode(&msg).unwrap_err();
    assert!(matches!(cause(&err), MessageError::IllegalParameter(_)));
}

#[test]
fn test_missing_mode_param_rejected() {
    let msg = Message::new(ChannelModeChange {
        channel: "#rust".into(),
        changes: vec![ModeChange::add(ChannelMode::Key)],
    });
    let err = Dispatcher::default().encode(&msg).unwrap_err();
    assert_eq!(cause(&err), &MessageError::MissingField("mode parameter"));
}

#[test]
fn test_too_many_parameters() {
    let params: Vec<String> = (0..16).map(|i| format!("p{}", i)).collect();
    let msg = Message::new(Command::Unknown(RawLine::new(None::<String>, "FOO", params)));
    let err = Dispatcher::default().encode(&msg).unwrap_err();
    assert_eq!(cause(&err), &MessageError::TooManyParameters(16));
}

#[test]
fn test_injection_rejected() {
    let msg = Message::privmsg("#a", "hello\r\nQUIT :bye");
    let err = Dispatcher::default().encode(&msg).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidMessage { .. }));
    assert_eq!(msg.kind(), CommandKind::Privmsg);
}
