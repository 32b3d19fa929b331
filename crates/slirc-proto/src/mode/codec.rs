//! Mode-string decoding and canonical encoding.

use crate::error::MessageError;

use super::types::{ModeAction, ModeChange, ModeType};

/// Decode a mode string, threading `params` onto the symbols that take them.
///
/// `+` and `-` switch the current action, which persists until changed; a
/// string without a leading sign starts as [`ModeAction::Add`]. Every other
/// character is a symbol. Parameters are assigned in symbol order to symbols
/// whose [`ModeType::takes_arg`] holds for the current action; when they run
/// out the remaining changes carry `None`. Surplus parameters are ignored.
pub fn decode<T: ModeType>(modes: &str, params: &[String]) -> Vec<ModeChange<T>> {
    let mut action = ModeAction::Add;
    let mut params = params.iter();
    let mut out = Vec::new();

    for c in modes.chars() {
        match c {
            '+' => action = ModeAction::Add,
            '-' => action = ModeAction::Remove,
            _ => {
                let symbol = T::from_char(c);
                let parameter = if symbol.takes_arg(action) {
                    params.next().cloned()
                } else {
                    None
                };
                out.push(ModeChange {
                    action,
                    symbol,
                    parameter,
                });
            }
        }
    }

    out
}

/// Canonical mode string for `changes`.
///
/// The first change always carries its sign; later changes carry a sign
/// only when the action differs from the previous change.
pub fn encode<T: ModeType>(changes: &[ModeChange<T>]) -> String {
    let mut out = String::with_capacity(changes.len() * 2);
    let mut current = None;

    for change in changes {
        if current != Some(change.action) {
            out.push(change.action.sign());
            current = Some(change.action);
        }
        out.push(change.symbol.to_char());
    }

    out
}

/// Parameters of `changes`, in symbol order.
pub fn encode_params<T: ModeType>(changes: &[ModeChange<T>]) -> Vec<String> {
    changes
        .iter()
        .filter_map(|c| c.parameter.clone())
        .collect()
}

/// Check that `changes` decode back to themselves once encoded.
///
/// A parameter on a symbol that takes none is rejected, as is a missing one
/// unless [`ModeType::param_optional`] allows it. A parameter following such
/// a parameterless change is rejected too: threading would attach it to the
/// wrong symbol.
pub fn check_params<T: ModeType>(changes: &[ModeChange<T>]) -> Result<(), MessageError> {
    let mut starved = false;

    for change in changes {
        let takes = change.symbol.takes_arg(change.action);
        match (&change.parameter, takes) {
            (Some(_), false) => {
                return Err(MessageError::IllegalParameter(change.flag()));
            }
            (Some(_), true) if starved => {
                return Err(MessageError::IllegalParameter(change.flag()));
            }
            (None, true) if !change.symbol.param_optional() => {
                return Err(MessageError::MissingField("mode parameter"));
            }
            (None, true) => starved = true,
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{ChannelMode, UserMode};

    fn params(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_run_length_encoding() {
        let changes = vec![
            ModeChange::add(UserMode::from_char('a')),
            ModeChange::add(UserMode::from_char('b')),
            ModeChange::remove(UserMode::from_char('c')),
        ];
        assert_eq!(encode(&changes), "+ab-c");
    }

    #[test]
    fn test_interleaved_signs() {
        let changes: Vec<ModeChange<UserMode>> = decode("+i-w+x-o", &[]);
        let pairs: Vec<(ModeAction, char)> = changes
            .iter()
            .map(|c| (c.action, c.symbol.to_char()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (ModeAction::Add, 'i'),
                (ModeAction::Remove, 'w'),
                (ModeAction::Add, 'x'),
                (ModeAction::Remove, 'o'),
            ]
        );
        assert_eq!(encode(&changes), "+i-w+x-o");
    }

    #[test]
    fn test_redundant_signs_collapse() {
        let changes: Vec<ModeChange<ChannelMode>> = decode("+n+t++-m-", &[]);
        assert_eq!(encode(&changes), "+nt-m");
    }

    #[test]
    fn test_unsigned_string_starts_as_add() {
        let changes: Vec<ModeChange<UserMode>> = decode("iw", &[]);
        assert!(changes.iter().all(|c| c.action == ModeAction::Add));
    }

    #[test]
    fn test_unknown_symbols_preserved() {
        let changes: Vec<ModeChange<ChannelMode>> = decode("+Y-Z", &[]);
        assert_eq!(changes[0].symbol, ChannelMode::Unknown('Y'));
        assert_eq!(changes[1].symbol, ChannelMode::Unknown('Z'));
        assert_eq!(encode(&changes), "+Y-Z");
    }

    #[test]
    fn test_parameters_threaded_in_symbol_order() {
        let changes: Vec<ModeChange<ChannelMode>> =
            decode("+ov-l+kb", &params(&["alice", "bob", "secret", "*!*@bad"]));
        assert_eq!(changes[0].parameter.as_deref(), Some("alice"));
        assert_eq!(changes[1].parameter.as_deref(), Some("bob"));
        assert_eq!(changes[2].parameter, None);
        assert_eq!(changes[3].parameter.as_deref(), Some("secret"));
        assert_eq!(changes[4].parameter.as_deref(), Some("*!*@bad"));
        assert_eq!(
            encode_params(&changes),
            params(&["alice", "bob", "secret", "*!*@bad"])
        );
    }

    #[test]
    fn test_list_query_without_parameter() {
        let changes: Vec<ModeChange<ChannelMode>> = decode("+b", &[]);
        assert_eq!(changes, vec![ModeChange::add(ChannelMode::Ban)]);
        assert!(check_params(&changes).is_ok());
    }

    #[test]
    fn test_check_params_rejects_misattribution() {
        let changes = vec![
            ModeChange::add(ChannelMode::Ban),
            ModeChange::add(ChannelMode::Voice).with_param("bob"),
        ];
        assert_eq!(
            check_params(&changes),
            Err(MessageError::IllegalParameter("+v".into()))
        );

        let changes = vec![ModeChange::add(ChannelMode::Secret).with_param("x")];
        assert_eq!(
            check_params(&changes),
            Err(MessageError::IllegalParameter("+s".into()))
        );
    }

    #[test]
    fn test_check_params_requires_parameters() {
        let changes = vec![ModeChange::add(ChannelMode::Oper)];
        assert_eq!(
            check_params(&changes),
            Err(MessageError::MissingField("mode parameter"))
        );

        // Limit only takes one when set; the snomask may be left out.
        assert!(check_params(&[ModeChange::remove(ChannelMode::Limit)]).is_ok());
        assert!(check_params(&[ModeChange::add(UserMode::ServerNotices)]).is_ok());
        assert!(check_params(&[ModeChange::add(UserMode::ServerNotices).with_param("+cF")]).is_ok());
    }

    #[test]
    fn test_empty_string() {
        let changes: Vec<ModeChange<UserMode>> = decode("", &[]);
        assert!(changes.is_empty());
        assert_eq!(encode(&changes), "");
    }
}
